//! `$faker` namespace: plausible fake data for request bodies.

use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use super::args::int_arg;
use super::unknown_function;
use crate::error::Result;

pub(super) const NAMESPACE: &str = "faker";

const FIRST_NAMES: &[&str] = &[
    "Ada", "Alan", "Grace", "Linus", "Margaret", "Dennis", "Barbara", "Ken", "Frances", "Edsger",
    "Radia", "Tim", "Hedy", "John", "Katherine", "Donald",
];

const LAST_NAMES: &[&str] = &[
    "Lovelace", "Turing", "Hopper", "Torvalds", "Hamilton", "Ritchie", "Liskov", "Thompson",
    "Allen", "Dijkstra", "Perlman", "Berners-Lee", "Lamarr", "McCarthy", "Johnson", "Knuth",
];

const DOMAINS: &[&str] = &["example.com", "example.org", "example.net", "test.dev"];

const COMPANY_STEMS: &[&str] = &[
    "Acme", "Globex", "Initech", "Umbrella", "Hooli", "Vandelay", "Stark", "Wayne", "Cyberdyne",
];

const COMPANY_SUFFIXES: &[&str] = &["Inc", "LLC", "Ltd", "Group", "Labs", "Systems"];

const CITIES: &[&str] = &[
    "Lisbon", "Oslo", "Kyoto", "Toronto", "Nairobi", "Lima", "Dublin", "Seoul", "Austin", "Porto",
];

const COUNTRIES: &[&str] = &[
    "Portugal", "Norway", "Japan", "Canada", "Kenya", "Peru", "Ireland", "Korea", "Chile", "Spain",
];

const STREET_NAMES: &[&str] = &["Main", "Oak", "Pine", "Maple", "Cedar", "Elm", "Lake", "Hill"];

const STREET_KINDS: &[&str] = &["St", "Ave", "Rd", "Blvd", "Lane", "Way"];

const WORDS: &[&str] = &[
    "alpha", "bravo", "cache", "delta", "echo", "fetch", "gamma", "header", "index", "json",
    "kernel", "latency", "method", "node", "object", "payload", "query", "route", "status",
    "token",
];

pub(super) fn call(path: &str, args: &[String]) -> Result<String> {
    let mut rng = rand::thread_rng();
    let value = match path {
        "firstName" => pick(&mut rng, FIRST_NAMES).to_string(),
        "lastName" => pick(&mut rng, LAST_NAMES).to_string(),
        "fullName" | "name" => {
            format!("{} {}", pick(&mut rng, FIRST_NAMES), pick(&mut rng, LAST_NAMES))
        }
        "username" => format!(
            "{}{}",
            pick(&mut rng, FIRST_NAMES).to_lowercase(),
            rng.gen_range(10..10_000)
        ),
        "email" => format!(
            "{}.{}{}@{}",
            pick(&mut rng, FIRST_NAMES).to_lowercase(),
            pick(&mut rng, LAST_NAMES).to_lowercase().replace('-', ""),
            rng.gen_range(1..1_000),
            pick(&mut rng, DOMAINS)
        ),
        "phone" => format!(
            "+1-{:03}-{:03}-{:04}",
            rng.gen_range(200..1_000),
            rng.gen_range(200..1_000),
            rng.gen_range(0..10_000)
        ),
        "company" => format!(
            "{} {}",
            pick(&mut rng, COMPANY_STEMS),
            pick(&mut rng, COMPANY_SUFFIXES)
        ),
        "city" => pick(&mut rng, CITIES).to_string(),
        "country" => pick(&mut rng, COUNTRIES).to_string(),
        "street" | "address" => format!(
            "{} {} {}",
            rng.gen_range(1..9_999),
            pick(&mut rng, STREET_NAMES),
            pick(&mut rng, STREET_KINDS)
        ),
        "word" => pick(&mut rng, WORDS).to_string(),
        "sentence" => {
            let count = int_arg(NAMESPACE, path, args, 0, 6)?.clamp(1, 50) as usize;
            let words: Vec<&str> = (0..count).map(|_| pick(&mut rng, WORDS)).collect();
            let mut sentence = words.join(" ");
            if let Some(first) = sentence.get_mut(0..1) {
                first.make_ascii_uppercase();
            }
            sentence.push('.');
            sentence
        }
        "uuid" => Uuid::new_v4().to_string(),
        _ => return Err(unknown_function(NAMESPACE, path)),
    };
    Ok(value)
}

fn pick<'a, R: Rng>(rng: &mut R, list: &[&'a str]) -> &'a str {
    // every list above is non-empty
    list.choose(rng).copied().unwrap_or_default()
}

//! `$random` namespace: identifiers and random values.
//!
//! - `{{$random.uuid}}`
//! - `{{$random.alphanumeric(12)}}`, `{{$random.hex(8)}}`
//! - `{{$random.int(1, 100)}}`, `{{$random.bool}}`
//! - `{{$random.pick(red, green, blue)}}`

use rand::distributions::Alphanumeric;
use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use super::args::{int_arg, len_arg};
use super::unknown_function;
use crate::error::{Result, StateError};

pub(super) const NAMESPACE: &str = "random";

const HEX_DIGITS: &[u8] = b"0123456789abcdef";

pub(super) fn call(path: &str, args: &[String]) -> Result<String> {
    match path {
        "uuid" | "guid" => Ok(Uuid::new_v4().to_string()),
        "alphanumeric" | "string" => {
            let len = len_arg(NAMESPACE, path, args, 0, 10)?;
            Ok(rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(len)
                .map(char::from)
                .collect())
        }
        "hex" => {
            let len = len_arg(NAMESPACE, path, args, 0, 16)?;
            let mut rng = rand::thread_rng();
            Ok((0..len)
                .map(|_| HEX_DIGITS[rng.gen_range(0..HEX_DIGITS.len())] as char)
                .collect())
        }
        "int" | "number" => {
            let min = int_arg(NAMESPACE, path, args, 0, 0)?;
            let max = int_arg(NAMESPACE, path, args, 1, 100)?;
            if min > max {
                return Err(StateError::invalid_argument(
                    NAMESPACE,
                    path,
                    format!("min ({}) cannot be greater than max ({})", min, max),
                ));
            }
            Ok(rand::thread_rng().gen_range(min..=max).to_string())
        }
        "bool" | "boolean" => Ok(rand::thread_rng().gen_bool(0.5).to_string()),
        "pick" => args
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| {
                StateError::invalid_argument(NAMESPACE, path, "pick needs at least one option")
            }),
        _ => Err(unknown_function(NAMESPACE, path)),
    }
}

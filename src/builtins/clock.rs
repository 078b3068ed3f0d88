//! `$date` namespace: the current time in several shapes.
//!
//! - `{{$date.now}}` / `{{$date.iso}}` - ISO 8601 with milliseconds, UTC
//! - `{{$date.timestamp}}` - Unix seconds, `{{$date.timestampMs}}` - Unix milliseconds
//! - `{{$date.rfc1123}}`
//! - `{{$date.format(%Y-%m-%d)}}` - chrono strftime pattern
//! - `{{$date.offset(-1, d)}}` - ISO 8601 shifted by an amount and unit (s, m, h, d, w),
//!   with an optional third argument naming the output (`iso`, `timestamp`, `timestampMs`,
//!   or a strftime pattern)

use std::fmt::Write;

use chrono::{DateTime, Duration, SecondsFormat, Utc};

use super::args::str_arg;
use super::unknown_function;
use crate::error::{Result, StateError};

pub(super) const NAMESPACE: &str = "date";

pub(super) fn call(path: &str, args: &[String]) -> Result<String> {
    let now = Utc::now();
    match path {
        "now" | "iso" => render(now, "iso"),
        "timestamp" | "unix" => render(now, "timestamp"),
        "timestampMs" => render(now, "timestampMs"),
        "rfc1123" => render(now, "rfc1123"),
        "format" => {
            let pattern = str_arg(NAMESPACE, path, args, 0)?;
            render(now, pattern)
        }
        "offset" => {
            let amount = str_arg(NAMESPACE, path, args, 0)?;
            let unit = str_arg(NAMESPACE, path, args, 1)?;
            let shifted = apply_offset(now, amount, unit)?;
            let shape = args.get(2).map(String::as_str).unwrap_or("iso");
            render(shifted, shape)
        }
        _ => Err(unknown_function(NAMESPACE, path)),
    }
}

fn render(at: DateTime<Utc>, shape: &str) -> Result<String> {
    let pattern = match shape {
        "iso" => return Ok(at.to_rfc3339_opts(SecondsFormat::Millis, true)),
        "timestamp" => return Ok(at.timestamp().to_string()),
        "timestampMs" => return Ok(at.timestamp_millis().to_string()),
        "rfc1123" => "%a, %d %b %Y %H:%M:%S GMT",
        pattern => pattern,
    };

    // chrono reports bad strftime items as a fmt error rather than at parse time
    let mut out = String::new();
    write!(out, "{}", at.format(pattern)).map_err(|_| {
        StateError::invalid_argument(NAMESPACE, "format", format!("invalid pattern: {}", pattern))
    })?;
    Ok(out)
}

/// Shifts `base` by `amount` units.
///
/// Amount may carry a sign (`-1`, `+2`). Units: s, m, h, d, w.
fn apply_offset(base: DateTime<Utc>, amount: &str, unit: &str) -> Result<DateTime<Utc>> {
    let number: i64 = amount.trim().parse().map_err(|_| {
        StateError::invalid_argument(NAMESPACE, "offset", format!("invalid amount: {}", amount))
    })?;

    let duration = match unit.trim() {
        "s" => Duration::try_seconds(number),
        "m" => Duration::try_minutes(number),
        "h" => Duration::try_hours(number),
        "d" => Duration::try_days(number),
        "w" => Duration::try_weeks(number),
        other => {
            return Err(StateError::invalid_argument(
                NAMESPACE,
                "offset",
                format!("invalid unit: {}. Use 's', 'm', 'h', 'd' or 'w'", other),
            ))
        }
    };

    duration
        .and_then(|d| base.checked_add_signed(d))
        .ok_or_else(|| {
            StateError::invalid_argument(NAMESPACE, "offset", format!("offset out of range: {}", amount))
        })
}

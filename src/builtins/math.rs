//! `$math` namespace: arithmetic over numeric arguments.
//!
//! Results that are whole numbers render without a fractional part, so
//! `{{$math.add(2, 3)}}` yields `5` and `{{$math.div(7, 2)}}` yields `3.5`.

use rand::Rng;

use super::args::{int_arg, num_arg};
use super::unknown_function;
use crate::error::{Result, StateError};

pub(super) const NAMESPACE: &str = "math";

pub(super) fn call(path: &str, args: &[String]) -> Result<String> {
    let value = match path {
        "add" => fold(path, args, |a, b| a + b)?,
        "sub" => fold(path, args, |a, b| a - b)?,
        "mul" => fold(path, args, |a, b| a * b)?,
        "div" => {
            let divisor = num_arg(NAMESPACE, path, args, 1)?;
            if divisor == 0.0 {
                return Err(StateError::invalid_argument(NAMESPACE, path, "division by zero"));
            }
            num_arg(NAMESPACE, path, args, 0)? / divisor
        }
        "mod" => {
            let divisor = num_arg(NAMESPACE, path, args, 1)?;
            if divisor == 0.0 {
                return Err(StateError::invalid_argument(NAMESPACE, path, "modulo by zero"));
            }
            num_arg(NAMESPACE, path, args, 0)? % divisor
        }
        "min" => fold(path, args, f64::min)?,
        "max" => fold(path, args, f64::max)?,
        "abs" => num_arg(NAMESPACE, path, args, 0)?.abs(),
        "floor" => num_arg(NAMESPACE, path, args, 0)?.floor(),
        "ceil" => num_arg(NAMESPACE, path, args, 0)?.ceil(),
        "round" => {
            let value = num_arg(NAMESPACE, path, args, 0)?;
            let digits = int_arg(NAMESPACE, path, args, 1, 0)?.clamp(0, 15) as i32;
            let factor = 10f64.powi(digits);
            (value * factor).round() / factor
        }
        "random" => {
            let min = int_arg(NAMESPACE, path, args, 0, 0)?;
            let max = int_arg(NAMESPACE, path, args, 1, 100)?;
            if min > max {
                return Err(StateError::invalid_argument(
                    NAMESPACE,
                    path,
                    format!("min ({}) cannot be greater than max ({})", min, max),
                ));
            }
            return Ok(rand::thread_rng().gen_range(min..=max).to_string());
        }
        _ => return Err(unknown_function(NAMESPACE, path)),
    };

    Ok(format_number(value))
}

/// Left fold over every argument; at least one is required.
fn fold(path: &str, args: &[String], op: impl Fn(f64, f64) -> f64) -> Result<f64> {
    let first = num_arg(NAMESPACE, path, args, 0)?;
    (1..args.len()).try_fold(first, |acc, i| Ok(op(acc, num_arg(NAMESPACE, path, args, i)?)))
}

fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

//! Canonical JSON normalization.
//!
//! Converts arbitrary JSON values into a deterministic, order-independent,
//! float-tolerant canonical form, and provides the total ordering over such
//! values that the rest of the crate uses for both sorting and equality.
//! Canonicalization must be applied before comparing: [`compare`] works on
//! serialized text, never by structural recursion.

use std::cmp::Ordering;

use itertools::Itertools;
use serde_json::{Map, Number, Value};

/// Absolute tolerance used when collapsing floating-point encoding noise.
pub const FLOAT_COMPARISON_EPSILON: f64 = 1e-9;

/// Relative tolerance of the closeness test, matching the rounding behavior
/// the host's widget values were originally normalized with.
const RELATIVE_TOLERANCE: f64 = 1e-9;

// IEEE-754 doubles carry ~15-17 significant digits.
const MAX_DECIMAL_PRECISION: i32 = 16;

fn is_close(a: f64, b: f64, abs_tol: f64) -> bool {
    (a - b).abs() <= f64::max(RELATIVE_TOLERANCE * f64::max(a.abs(), b.abs()), abs_tol)
}

/// Rounds `x` to the fewest decimal places such that the rounded value is
/// still within `epsilon` of `x`. Returns `x` unchanged if no rounding within
/// [`MAX_DECIMAL_PRECISION`] digits qualifies.
///
/// Widget values serialize with spurious trailing digits (`0.7000000000000001`);
/// this collapses them back to the value the user actually typed, so that
/// semantically equal graphs compare equal despite encoding noise.
pub fn normalize_float(x: f64, epsilon: f64) -> f64 {
    for precision in 0..MAX_DECIMAL_PRECISION {
        let factor = 10f64.powi(precision);
        let rounded = (x * factor).round() / factor;
        if is_close(x, rounded, epsilon) {
            return rounded;
        }
    }
    x
}

/// Converts a JSON value to its canonical form.
///
/// Floats are normalized via [`normalize_float`], object keys are re-inserted
/// in ascending byte order at every nesting level, and arrays keep their
/// element order: array order is semantically significant and is never sorted.
/// Integers, strings, booleans, and null pass through unchanged.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Number(num) => {
            let normalized = num
                .as_f64()
                .filter(|_| num.is_f64())
                .map(|x| normalize_float(x, FLOAT_COMPARISON_EPSILON))
                .and_then(Number::from_f64);
            match normalized {
                Some(rounded) => Value::Number(rounded),
                None => Value::Number(num.clone()),
            }
        }
        Value::Object(map) => {
            let sorted: Map<String, Value> = map
                .iter()
                .map(|(key, val)| (key.clone(), canonicalize(val)))
                .sorted_by(|a, b| a.0.cmp(&b.0))
                .collect();
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

/// Serializes a JSON value compactly, with `,`/`:` separators and keys in
/// map insertion order. For a canonical form this is the total-order witness:
/// two canonical values are equal iff their serializations are identical.
pub fn stringify(value: &Value) -> String {
    // Serializing a `serde_json::Value` cannot fail.
    serde_json::to_string(value).unwrap_or_default()
}

/// Total ordering over JSON values via their serialized text.
///
/// Returns `Ordering::Equal` iff the serializations are character-identical,
/// so both inputs must already be canonical forms.
pub fn compare(a: &Value, b: &Value) -> Ordering {
    stringify(a).cmp(&stringify(b))
}

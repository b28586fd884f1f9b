// ── Structural value equality ──
//
// Decides whether freshly fetched data differs from what is already on
// screen. Dispatches on the `Value` variant; containers recurse, scalars of
// the same kind compare by value.

use serde_json::{Map, Number, Value};

/// Deep structural equality over JSON values.
///
/// - values of different kinds are never equal (an array never equals an object)
/// - arrays are equal when they have the same length and equal elements in order
/// - objects are equal when they have the same key set and equal values per key
/// - numbers compare by numeric value, so `1` equals `1.0`
/// - `null` equals only `null`
///
/// Total over `Value`: reflexive, symmetric, never panics.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => sequences_equal(x, y),
        (Value::Object(x), Value::Object(y)) => records_equal(x, y),
        _ => false,
    }
}

/// Element-wise equality of two ordered sequences.
pub fn sequences_equal(a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| deep_equal(x, y))
}

/// Key-set and per-key value equality of two records.
pub fn records_equal(a: &Map<String, Value>, b: &Map<String, Value>) -> bool {
    // Equal sizes plus every key of `a` present in `b` means identical key sets.
    a.len() == b.len()
        && a
            .iter()
            .all(|(key, value)| b.get(key).is_some_and(|other| deep_equal(value, other)))
}

#[allow(clippy::float_cmp)]
fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// Loose equality between a submitted form value and the value it started from.
///
/// A missing value and `null` are interchangeable. Scalars of different kinds
/// are coerced the way a browser form would: booleans count as `1`/`0`, and
/// numeric strings compare numerically against numbers. Containers fall back
/// to [`deep_equal`].
pub fn loosely_equal(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a.unwrap_or(&Value::Null), b.unwrap_or(&Value::Null)) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (x, y) if same_kind(x, y) => deep_equal(x, y),
        (x, y) => match (as_number(x), as_number(y)) {
            (Some(m), Some(n)) => (m - n).abs() < f64::EPSILON,
            _ => false,
        },
    }
}

fn same_kind(a: &Value, b: &Value) -> bool {
    std::mem::discriminant(a) == std::mem::discriminant(b)
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => Some(0.0),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

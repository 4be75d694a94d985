use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Integer coercion with the UI's parseInt rules: numbers truncate, strings
/// are read from their leading integer prefix. Anything else is `null`.
pub fn get_int(value: &Value) -> Value {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                match n.as_f64().and_then(truncate_f64) {
                    Some(i) => Value::from(i),
                    None => Value::Null,
                }
            }
        }
        Value::String(s) => match parse_int_prefix(s) {
            Some(i) => Value::from(i),
            None => Value::Null,
        },
        _ => Value::Null,
    }
}

fn truncate_f64(f: f64) -> Option<i64> {
    if f.is_finite() && f.abs() < i64::MAX as f64 {
        Some(f.trunc() as i64)
    } else {
        None
    }
}

fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, digits) = match rest.get(..2) {
        Some("0x") | Some("0X") => (16, &rest[2..]),
        _ => (10, rest),
    };

    let end = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let n = i64::from_str_radix(&digits[..end], radix).ok()?;
    if negative {
        Some(-n)
    } else {
        Some(n)
    }
}

/// Only `true` and `"true"` are true.
pub fn get_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s == "true",
        _ => false,
    }
}

/// Splits a comma separated value into a list of strings. Arrays are joined
/// first, so `["a", "b,c"]` gives `["a", "b", "c"]`.
pub fn split_commas(value: &Value) -> Value {
    let text = to_text(value);
    if text.is_empty() {
        return Value::Array(vec![]);
    }

    Value::Array(
        text.split(',')
            .map(|item| Value::String(item.to_owned()))
            .collect(),
    )
}

fn to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(to_text).collect::<Vec<_>>().join(","),
        Value::Bool(_) | Value::Number(_) | Value::Object(_) => value.to_string(),
    }
}

/// `""` and `[]` become `null`.
pub fn empty_to_null(value: &Value) -> Value {
    match value {
        Value::String(s) if s.is_empty() => Value::Null,
        Value::Array(items) if items.is_empty() => Value::Null,
        _ => value.clone(),
    }
}

/// For `Option` fields that must tell an explicit `null` (`Some(null)`) from
/// a missing key (`None`, via `#[serde(default)]`).
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

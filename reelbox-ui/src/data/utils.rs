use std::sync::Arc;

use serde_json::Value;

/// First of `keys` holding a non-blank string or a number, as text.
pub fn str_field(value: &Value, keys: &[&str]) -> Option<Arc<str>> {
    keys.iter().find_map(|key| match value.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().into()),
        Value::Number(n) => Some(n.to_string().into()),
        _ => None,
    })
}

/// First of `keys` holding a non-negative integer, accepting numeric strings.
pub fn u64_field(value: &Value, keys: &[&str]) -> Option<u64> {
    keys.iter().find_map(|key| match value.get(*key)? {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f.max(0.0) as u64),
        _ => None,
    })
}

/// First of `keys` holding an array.
pub fn list_field<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a [Value]> {
    keys.iter()
        .find_map(|key| value.get(*key)?.as_array())
        .map(Vec::as_slice)
}

/// URL of an image field that is either a plain string or an object with a
/// `url` member.
pub fn image_url(value: &Value, keys: &[&str]) -> Option<Arc<str>> {
    keys.iter().find_map(|key| match value.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().into()),
        obj @ Value::Object(_) => str_field(obj, &["url"]),
        _ => None,
    })
}

// src/ingest/lenient.rs
//! Tolerant serde helpers for provider payloads. Providers flip between
//! numbers and strings for ids and amounts, send `null` for lists, or wrap
//! JSON inside strings; none of that should cost us a listing.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// String, number or bool rendered as text; `null`/objects become `None`.
pub fn opt_string<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(d)?;
    Ok(v.as_ref().and_then(value_to_string))
}

/// Number or numeric string.
pub fn opt_f64<'de, D>(d: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(d)?;
    Ok(v.as_ref().and_then(value_to_f64))
}

/// Integer, float or numeric string, truncated toward zero.
pub fn opt_i64<'de, D>(d: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(d)?;
    Ok(v.as_ref().and_then(|v| match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }))
}

/// Bool, or the strings/numbers people use for one.
pub fn opt_bool<'de, D>(d: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(d)?;
    Ok(v.as_ref().and_then(|v| match v {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }))
}

/// List of strings; a bare string becomes a one-element list, `null` an empty one.
pub fn string_list<'de, D>(d: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(d)?;
    Ok(match v {
        Some(Value::Array(items)) => items.iter().filter_map(value_to_string).collect(),
        Some(other) => value_to_string(&other).into_iter().collect(),
        None => Vec::new(),
    })
}

pub fn value_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => {
            let t = s.trim();
            (!t.is_empty()).then(|| t.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn value_to_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    }
}

/// `{value:{minValue,maxValue}}` salary block, given either as an object or
/// as a JSON document inside a string.
pub fn salary_range(raw: Option<&Value>) -> (Option<f64>, Option<f64>) {
    let parsed;
    let obj = match raw {
        Some(Value::String(s)) => match serde_json::from_str::<Value>(s) {
            Ok(v) => {
                parsed = v;
                &parsed
            }
            Err(_) => return (None, None),
        },
        Some(v @ Value::Object(_)) => v,
        _ => return (None, None),
    };
    let value = obj.get("value");
    let min = value.and_then(|v| v.get("minValue")).and_then(value_to_f64);
    let max = value.and_then(|v| v.get("maxValue")).and_then(value_to_f64);
    (min, max)
}

/// Empty strings count as absent.
pub fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "opt_string")]
        id: Option<String>,
        #[serde(default, deserialize_with = "opt_f64")]
        amount: Option<f64>,
        #[serde(default, deserialize_with = "string_list")]
        tags: Vec<String>,
    }

    #[test]
    fn ids_accept_numbers_and_strings() {
        let a: Probe = serde_json::from_value(json!({"id": 42})).unwrap();
        let b: Probe = serde_json::from_value(json!({"id": "x-1"})).unwrap();
        let c: Probe = serde_json::from_value(json!({"id": null})).unwrap();
        assert_eq!(a.id.as_deref(), Some("42"));
        assert_eq!(b.id.as_deref(), Some("x-1"));
        assert_eq!(c.id, None);
    }

    #[test]
    fn amounts_and_lists_are_tolerant() {
        let p: Probe =
            serde_json::from_value(json!({"amount": "120,000", "tags": "rust"})).unwrap();
        assert_eq!(p.amount, Some(120_000.0));
        assert_eq!(p.tags, vec!["rust".to_string()]);
        let q: Probe = serde_json::from_value(json!({"tags": null})).unwrap();
        assert!(q.tags.is_empty());
        assert_eq!(q.amount, None);
    }

    #[test]
    fn salary_from_string_or_object() {
        let s = json!("{\"value\":{\"minValue\":90000,\"maxValue\":120000}}");
        assert_eq!(salary_range(Some(&s)), (Some(90_000.0), Some(120_000.0)));
        let o = json!({"value": {"minValue": 50000}});
        assert_eq!(salary_range(Some(&o)), (Some(50_000.0), None));
        assert_eq!(salary_range(Some(&json!("not json"))), (None, None));
        assert_eq!(salary_range(None), (None, None));
    }
}

//! Runtime document values.
//!
//! Entity documents arrive as JSON. Most JSON maps onto [`Value`] directly;
//! the three types JSON cannot express are written as single-key tagged
//! objects:
//!
//! ```json
//! { "$ref": "authors/tolkien" }
//! { "$date": "2024-03-01T10:00:00Z" }
//! { "$geo": [48.85, 2.35] }
//! ```
//!
//! A tagged object whose payload does not parse stays a plain map, so a bad
//! date lands in the preview as a type mismatch instead of a load failure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

const REF_TAG: &str = "$ref";
const DATE_TAG: &str = "$date";
const GEO_TAG: &str = "$geo";

/// A handle to another entity: the collection path plus the entity id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityReference {
    pub id: String,
    pub path: String,
}

impl EntityReference {
    pub fn new(path: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
        }
    }

    /// Parse `collection/id` (nested paths allowed, the last segment is the id).
    pub fn parse(path_with_id: &str) -> Option<Self> {
        let (path, id) = path_with_id.trim_matches('/').rsplit_once('/')?;
        if path.is_empty() || id.is_empty() {
            return None;
        }
        Some(Self::new(path, id))
    }

    pub fn path_with_id(&self) -> String {
        format!("{}/{}", self.path, self.id)
    }
}

impl fmt::Display for EntityReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.path, self.id)
    }
}

/// A document value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum Value {
    Null,
    String(String),
    Number(f64),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Reference(EntityReference),
    GeoPoint { latitude: f64, longitude: f64 },
}

/// The runtime type of a [`Value`], used in mismatch reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Null,
    String,
    Number,
    Boolean,
    Timestamp,
    Array,
    Map,
    Reference,
    GeoPoint,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::Boolean => "boolean",
            ValueKind::Timestamp => "timestamp",
            ValueKind::Array => "array",
            ValueKind::Map => "map",
            ValueKind::Reference => "reference",
            ValueKind::GeoPoint => "geopoint",
        };
        f.write_str(name)
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::String(_) => ValueKind::String,
            Value::Number(_) => ValueKind::Number,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Timestamp(_) => ValueKind::Timestamp,
            Value::Array(_) => ValueKind::Array,
            Value::Map(_) => ValueKind::Map,
            Value::Reference(_) => ValueKind::Reference,
            Value::GeoPoint { .. } => ValueKind::GeoPoint,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Decode an entity JSON value, recognising the tagged object forms.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            // Every JSON number fits an f64, possibly with precision loss above 2^53.
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => {
                if let Some(tagged) = decode_tagged(&map) {
                    return tagged;
                }
                Value::Map(
                    map.into_iter()
                        .map(|(k, v)| (k, Value::from_json(v)))
                        .collect(),
                )
            }
        }
    }

    /// Encode back to entity JSON.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;
        match self {
            Value::Null => serde_json::Value::Null,
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Number(n) => number_to_json(*n),
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::Timestamp(ts) => json!({ DATE_TAG: ts.to_rfc3339() }),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Map(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            Value::Reference(reference) => json!({ REF_TAG: reference.path_with_id() }),
            Value::GeoPoint {
                latitude,
                longitude,
            } => json!({ GEO_TAG: [latitude, longitude] }),
        }
    }
}

fn decode_tagged(map: &serde_json::Map<String, serde_json::Value>) -> Option<Value> {
    if map.len() != 1 {
        return None;
    }
    let (tag, payload) = map.iter().next()?;
    match tag.as_str() {
        REF_TAG => EntityReference::parse(payload.as_str()?).map(Value::Reference),
        DATE_TAG => DateTime::parse_from_rfc3339(payload.as_str()?)
            .ok()
            .map(|ts| Value::Timestamp(ts.with_timezone(&Utc))),
        GEO_TAG => match payload.as_array()?.as_slice() {
            [lat, lon] => Some(Value::GeoPoint {
                latitude: lat.as_f64()?,
                longitude: lon.as_f64()?,
            }),
            _ => None,
        },
        _ => None,
    }
}

fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        Value::from_json(json)
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        value.to_json()
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_reference_parse_nested_path() {
        let reference = EntityReference::parse("users/alice/posts/42").unwrap();
        assert_eq!(reference.path, "users/alice/posts");
        assert_eq!(reference.id, "42");
        assert_eq!(reference.to_string(), "users/alice/posts/42");
    }

    #[test]
    fn test_reference_parse_rejects_bare_id() {
        assert!(EntityReference::parse("lonely").is_none());
        assert!(EntityReference::parse("/").is_none());
    }

    #[test]
    fn test_from_json_tagged_values() {
        let value = Value::from_json(json!({
            "author": { "$ref": "authors/tolkien" },
            "published": { "$date": "1954-07-29T00:00:00Z" },
            "origin": { "$geo": [51.75, -1.25] },
        }));
        let map = value.as_map().unwrap();
        assert_eq!(
            map["author"],
            Value::Reference(EntityReference::new("authors", "tolkien"))
        );
        assert_eq!(
            map["published"],
            Value::Timestamp(Utc.with_ymd_and_hms(1954, 7, 29, 0, 0, 0).unwrap())
        );
        assert_eq!(
            map["origin"],
            Value::GeoPoint {
                latitude: 51.75,
                longitude: -1.25
            }
        );
    }

    #[test]
    fn test_bad_date_payload_stays_a_map() {
        let value = Value::from_json(json!({ "$date": "yesterday" }));
        assert_eq!(value.kind(), ValueKind::Map);
    }

    #[test]
    fn test_integral_numbers_encode_without_fraction() {
        assert_eq!(Value::Number(3.0).to_json(), json!(3));
        assert_eq!(Value::Number(2.5).to_json(), json!(2.5));
    }

    #[test]
    fn test_serde_uses_entity_json_shape() {
        let value: Value = serde_json::from_str(r#"[1, "two", {"$ref": "a/b"}]"#).unwrap();
        assert_eq!(
            value,
            Value::Array(vec![
                Value::Number(1.0),
                Value::from("two"),
                Value::Reference(EntityReference::new("a", "b")),
            ])
        );
        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            r#"[1,"two",{"$ref":"a/b"}]"#
        );
    }
}

//! Enumerated value sets for string and number properties.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::value::Value;

/// The id of one enum option. Options keyed by a table are always strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnumKey {
    Number(f64),
    String(String),
}

impl EnumKey {
    /// Check whether a document value selects this option.
    ///
    /// Table keys are strings, so a numeric value also matches the key
    /// spelled the same way (`1` matches `"1"`).
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (EnumKey::String(key), Value::String(s)) => key == s,
            (EnumKey::String(key), Value::Number(n)) => *key == number_key(*n),
            (EnumKey::Number(key), Value::Number(n)) => key == n,
            (EnumKey::Number(key), Value::String(s)) => s.parse::<f64>().is_ok_and(|n| n == *key),
            _ => false,
        }
    }
}

impl fmt::Display for EnumKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumKey::Number(n) => f.write_str(&number_key(*n)),
            EnumKey::String(s) => f.write_str(s),
        }
    }
}

fn number_key(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// A fully specified enum option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumValueConfig {
    pub id: EnumKey,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub disabled: bool,
}

/// Enum options, written either as a `{ key = "Label" }` table or as a list
/// of [`EnumValueConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnumValues {
    List(Vec<EnumValueConfig>),
    Table(BTreeMap<String, String>),
}

impl EnumValues {
    /// Normalise to a list of options.
    pub fn options(&self) -> Vec<EnumValueConfig> {
        match self {
            EnumValues::List(list) => list.clone(),
            EnumValues::Table(table) => table
                .iter()
                .map(|(id, label)| EnumValueConfig {
                    id: EnumKey::String(id.clone()),
                    label: label.clone(),
                    color: None,
                    disabled: false,
                })
                .collect(),
        }
    }

    /// Find the option selected by `value`.
    pub fn resolve(&self, value: &Value) -> Option<EnumValueConfig> {
        self.options().into_iter().find(|option| option.id.matches(value))
    }

    pub fn len(&self) -> usize {
        match self {
            EnumValues::List(list) => list.len(),
            EnumValues::Table(table) => table.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_form_parses_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            enum_values: EnumValues,
        }
        let wrapper: Wrapper =
            toml::from_str("enum_values = { fiction = \"Fiction\", poetry = \"Poetry\" }").unwrap();
        let option = wrapper.enum_values.resolve(&Value::from("poetry")).unwrap();
        assert_eq!(option.label, "Poetry");
        assert_eq!(wrapper.enum_values.len(), 2);
    }

    #[test]
    fn test_list_form_with_numeric_ids() {
        #[derive(Deserialize)]
        struct Wrapper {
            enum_values: EnumValues,
        }
        let wrapper: Wrapper = toml::from_str(
            r#"
            enum_values = [
                { id = 1, label = "One", color = "blue" },
                { id = 2, label = "Two", disabled = true },
            ]
            "#,
        )
        .unwrap();
        let option = wrapper.enum_values.resolve(&Value::Number(2.0)).unwrap();
        assert_eq!(option.label, "Two");
        assert!(option.disabled);
        assert!(wrapper.enum_values.resolve(&Value::Number(3.0)).is_none());
    }

    #[test]
    fn test_string_key_matches_integral_number() {
        let key = EnumKey::String("7".to_string());
        assert!(key.matches(&Value::Number(7.0)));
        assert!(!key.matches(&Value::Number(7.5)));
    }

    #[test]
    fn test_large_number_does_not_match_saturated_key() {
        let key = EnumKey::String(i64::MAX.to_string());
        assert!(!key.matches(&Value::Number(1e19)));
        assert_eq!(EnumKey::Number(1e19).to_string(), "10000000000000000000");
    }

    #[test]
    fn test_number_key_display_drops_fraction() {
        assert_eq!(EnumKey::Number(3.0).to_string(), "3");
        assert_eq!(EnumKey::Number(0.5).to_string(), "0.5");
    }
}

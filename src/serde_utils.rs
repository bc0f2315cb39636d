/// Serde utility functions for loosely typed remote columns
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;

/// Column values that are text in some tables and numbers in others
/// (`id`, `family_no`, `mobile_no1`).
#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for Loose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Loose::Text(s) => f.write_str(s),
            Loose::Int(n) => write!(f, "{n}"),
            Loose::Float(n) => write!(f, "{n}"),
            Loose::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Deserialize a string or a number into a `String`.
///
/// Usage:
/// ```ignore
/// #[derive(Deserialize)]
/// struct Row {
///     #[serde(deserialize_with = "crate::serde_utils::string_or_number")]
///     id: String,
/// }
/// ```
pub fn string_or_number<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Loose::deserialize(de).map(|v| v.to_string())
}

/// Like [`string_or_number`] but `null` (or a missing field with
/// `#[serde(default)]`) becomes `None`, and so does an empty string.
pub fn opt_string_or_number<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Loose> = Option::deserialize(de)?;
    Ok(value.map(|v| v.to_string()).filter(|s| !s.is_empty()))
}

/// Turn a stored id back into the JSON value used in filters. Numeric text
/// stays numeric so `eq` works against integer keys.
pub fn id_value(id: &str) -> Value {
    id.parse::<i64>()
        .map(Value::from)
        .unwrap_or_else(|_| Value::String(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Row {
        #[serde(deserialize_with = "string_or_number")]
        id: String,
        #[serde(default, deserialize_with = "opt_string_or_number")]
        family_no: Option<String>,
    }

    #[test]
    fn numbers_and_strings_become_text() {
        let row: Row = serde_json::from_value(json!({"id": 7, "family_no": "F-12"})).unwrap();
        assert_eq!(row.id, "7");
        assert_eq!(row.family_no.as_deref(), Some("F-12"));

        let row: Row =
            serde_json::from_value(json!({"id": "9b2c-uuid", "family_no": 104})).unwrap();
        assert_eq!(row.id, "9b2c-uuid");
        assert_eq!(row.family_no.as_deref(), Some("104"));
    }

    #[test]
    fn null_missing_and_empty_are_none() {
        let row: Row = serde_json::from_value(json!({"id": 1, "family_no": null})).unwrap();
        assert_eq!(row.family_no, None);
        let row: Row = serde_json::from_value(json!({"id": 1})).unwrap();
        assert_eq!(row.family_no, None);
        let row: Row = serde_json::from_value(json!({"id": 1, "family_no": ""})).unwrap();
        assert_eq!(row.family_no, None);
    }

    #[test]
    fn id_value_keeps_numeric_ids_numeric() {
        assert_eq!(id_value("42"), json!(42));
        assert_eq!(id_value("a1b2"), json!("a1b2"));
    }
}

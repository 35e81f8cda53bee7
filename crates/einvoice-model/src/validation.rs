//! Leaf-level validation metadata.

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Primitive value type of a leaf field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseType {
    #[default]
    String,
    Decimal,
    Number,
    Date,
    Time,
    Boolean,
    /// Any base type this engine does not know; rendered as free text.
    #[serde(other)]
    Other,
}

impl BaseType {
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Decimal | Self::Number)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Decimal => "decimal",
            Self::Number => "number",
            Self::Date => "date",
            Self::Time => "time",
            Self::Boolean => "boolean",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation bound to a leaf component by `name`.
///
/// `resource` is the code list of an enumerated field; an empty map means
/// the field is free-form. Any other keys of the schema object (length,
/// pattern, fraction digits, ...) are kept verbatim in `constraints` and are
/// never interpreted locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validation {
    pub name: String,
    #[serde(default)]
    pub base_type: BaseType,
    #[serde(default, deserialize_with = "deserialize_resource")]
    pub resource: IndexMap<String, String>,
    #[serde(flatten)]
    pub constraints: BTreeMap<String, serde_json::Value>,
}

impl Validation {
    pub fn new(name: impl Into<String>, base_type: BaseType) -> Self {
        Self {
            name: name.into(),
            base_type,
            resource: IndexMap::new(),
            constraints: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_resource<I, C, L>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (C, L)>,
        C: Into<String>,
        L: Into<String>,
    {
        self.resource = entries
            .into_iter()
            .map(|(code, label)| (code.into(), label.into()))
            .collect();
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawResource {
    Map(IndexMap<String, serde_json::Value>),
    Other(serde_json::Value),
}

/// Accepts a `code -> label` object; `null`, `[]` and `""` read as empty.
fn deserialize_resource<'de, D>(deserializer: D) -> Result<IndexMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawResource>::deserialize(deserializer)?;
    let Some(RawResource::Map(entries)) = raw else {
        return Ok(IndexMap::new());
    };
    Ok(entries
        .into_iter()
        .map(|(code, label)| {
            let label = match label {
                serde_json::Value::String(text) => text,
                serde_json::Value::Null => code.clone(),
                other => other.to_string(),
            };
            (code, label)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_keeps_declaration_order() {
        let validation: Validation = serde_json::from_str(
            r#"{"name":"CurrencyType","base_type":"string","resource":{"USD":"US Dollar","EUR":"Euro","AUD":"Australian Dollar"}}"#,
        )
        .unwrap();
        let codes: Vec<&str> = validation.resource.keys().map(String::as_str).collect();
        assert_eq!(codes, ["USD", "EUR", "AUD"]);
    }

    #[test]
    fn empty_resource_shapes_are_accepted() {
        for raw in [r#"[]"#, r#"null"#, r#""""#, r#"{}"#] {
            let json = format!(r#"{{"name":"NoteType","base_type":"string","resource":{raw}}}"#);
            let validation: Validation = serde_json::from_str(&json).unwrap();
            assert!(validation.resource.is_empty(), "resource {raw}");
        }
    }

    #[test]
    fn unknown_keys_become_constraints() {
        let validation: Validation = serde_json::from_str(
            r#"{"name":"NoteType","base_type":"string","max_length":300}"#,
        )
        .unwrap();
        assert_eq!(validation.constraints["max_length"], serde_json::json!(300));
    }

    #[test]
    fn unknown_base_type_is_other() {
        let validation: Validation =
            serde_json::from_str(r#"{"name":"BlobType","base_type":"binary"}"#).unwrap();
        assert_eq!(validation.base_type, BaseType::Other);
    }
}

//! Field kinds and payload values.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::{BaseType, Validation};

/// One entry of an enumerated field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropdownOption {
    pub code: String,
    pub label: String,
}

/// The kind of input a leaf field is rendered as.
///
/// Decided once per leaf from its [`Validation`]: a non-empty resource wins,
/// then numeric base types, then dates; everything else is free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FieldKind {
    Dropdown { options: Vec<DropdownOption> },
    Numeric,
    Date,
    Text,
}

impl FieldKind {
    pub fn from_validation(validation: &Validation) -> Self {
        if !validation.resource.is_empty() {
            let options = validation
                .resource
                .iter()
                .map(|(code, label)| DropdownOption {
                    code: code.clone(),
                    label: label.clone(),
                })
                .collect();
            return Self::Dropdown { options };
        }
        match validation.base_type {
            BaseType::Decimal | BaseType::Number => Self::Numeric,
            BaseType::Date => Self::Date,
            _ => Self::Text,
        }
    }

    /// Widget tag handed to the rendering layer.
    pub fn widget(&self) -> &'static str {
        match self {
            Self::Dropdown { .. } => "select",
            Self::Numeric => "number",
            Self::Date => "date",
            Self::Text => "text",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric)
    }

    /// Options of a dropdown; empty for every other kind.
    pub fn options(&self) -> &[DropdownOption] {
        match self {
            Self::Dropdown { options } => options,
            _ => &[],
        }
    }
}

/// A payload value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Value an optional field gets when it is re-activated.
    pub fn activation_default(base_type: BaseType) -> Self {
        match base_type {
            BaseType::Boolean => Self::Bool(false),
            BaseType::Decimal | BaseType::Number => Self::Number(0.0),
            _ => Self::Text(String::new()),
        }
    }

    /// Value stored in a settings object. Nulls, objects and arrays have no
    /// payload counterpart.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(flag) => Some(Self::Bool(*flag)),
            Value::Number(number) => number.as_f64().map(Self::Number),
            Value::String(text) => Some(Self::Text(text.clone())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Parse user input as a finite float. Surrounding whitespace is ignored.
    pub fn parse_number(raw: &str) -> Option<f64> {
        raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

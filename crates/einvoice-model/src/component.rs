//! Schema graph nodes and the document that carries them.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::validation::Validation;

const TYPE_SUFFIX: &str = "Type";

/// Strip the trailing `Type` from a component type to get its field key.
///
/// Types without the suffix are returned unchanged.
pub fn field_key(component_type: &str) -> &str {
    component_type
        .strip_suffix(TYPE_SUFFIX)
        .filter(|stem| !stem.is_empty())
        .unwrap_or(component_type)
}

/// Build the component type an element name refers to (`"<name>Type"`).
pub fn component_type(name: &str) -> String {
    format!("{name}{TYPE_SUFFIX}")
}

/// Reference from a container to a child component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementRef {
    pub name: String,
    #[serde(default)]
    pub min: u32,
    /// Upper bound; `None` means unbounded.
    #[serde(default, deserialize_with = "deserialize_max_occurs")]
    pub max: Option<u32>,
}

impl ElementRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            min: 0,
            max: Some(1),
        }
    }

    /// The component type this element resolves to.
    pub fn target_type(&self) -> String {
        component_type(&self.name)
    }
}

/// A node in the schema graph.
///
/// A component with no elements is a leaf and is bound to the
/// [`Validation`] whose `name` equals its `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    #[serde(rename = "type")]
    pub component_type: String,
    #[serde(default)]
    pub elements: Vec<ElementRef>,
}

impl Component {
    pub fn leaf(component_type: impl Into<String>) -> Self {
        Self {
            component_type: component_type.into(),
            elements: Vec::new(),
        }
    }

    pub fn container<I, S>(component_type: impl Into<String>, element_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            component_type: component_type.into(),
            elements: element_names.into_iter().map(ElementRef::new).collect(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn field_key(&self) -> &str {
        field_key(&self.component_type)
    }
}

/// Field metadata keyed by field key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub key: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "type", default)]
    pub rule_type: Option<String>,
    #[serde(default)]
    pub resource: Option<serde_json::Value>,
    #[serde(default)]
    pub required: bool,
}

impl Rule {
    pub fn new(key: impl Into<String>, label: impl Into<String>, required: bool) -> Self {
        Self {
            key: key.into(),
            label: Some(label.into()),
            rule_type: None,
            resource: None,
            required,
        }
    }
}

/// A complete per-country schema as delivered by the schema resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDocument {
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub validations: Vec<Validation>,
    #[serde(default)]
    pub default_fields: IndexMap<String, String>,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub excluded: Vec<String>,
}

impl SchemaDocument {
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MaxOccurs {
    Bounded(u32),
    Named(String),
}

fn deserialize_max_occurs<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<MaxOccurs> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(MaxOccurs::Bounded(value)) => Some(value),
        Some(MaxOccurs::Named(text)) => text.trim().parse().ok(),
        None => None,
    })
}

//! Lookup tables over a single schema document.

use std::collections::HashMap;

use einvoice_model::{Component, Rule, SchemaDocument, Validation, field_key};
use indexmap::IndexMap;

use crate::exclusion::ExclusionSet;

/// Indexed view of a [`SchemaDocument`].
///
/// Building is a single O(n) pass with no recursion. Every lookup returns
/// `Option`; a miss is never an error. When a type, validation name or rule
/// key is declared twice the first declaration wins.
#[derive(Debug, Clone, Default)]
pub struct TypeGraph {
    components: Vec<Component>,
    components_by_type: HashMap<String, usize>,
    validations_by_name: HashMap<String, Validation>,
    rules_by_key: HashMap<String, Rule>,
    default_fields: IndexMap<String, String>,
    excluded: Vec<String>,
}

impl TypeGraph {
    pub fn build(schema: SchemaDocument) -> Self {
        let SchemaDocument {
            rules,
            validations,
            default_fields,
            components,
            excluded,
        } = schema;

        let mut components_by_type = HashMap::with_capacity(components.len());
        for (index, component) in components.iter().enumerate() {
            components_by_type
                .entry(component.component_type.clone())
                .or_insert(index);
        }

        let mut validations_by_name = HashMap::with_capacity(validations.len());
        for validation in validations {
            validations_by_name
                .entry(validation.name.clone())
                .or_insert(validation);
        }

        let mut rules_by_key = HashMap::with_capacity(rules.len());
        for rule in rules {
            rules_by_key.entry(rule.key.clone()).or_insert(rule);
        }

        tracing::debug!(
            components = components.len(),
            validations = validations_by_name.len(),
            rules = rules_by_key.len(),
            default_fields = default_fields.len(),
            excluded = excluded.len(),
            "Indexed schema document"
        );

        Self {
            components,
            components_by_type,
            validations_by_name,
            rules_by_key,
            default_fields,
            excluded,
        }
    }

    /// Components in declaration order.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn component(&self, component_type: &str) -> Option<&Component> {
        self.components_by_type
            .get(component_type)
            .map(|&index| &self.components[index])
    }

    /// Declaration index of a component type, used for stable ordering.
    pub fn position(&self, component_type: &str) -> Option<usize> {
        self.components_by_type.get(component_type).copied()
    }

    pub fn validation(&self, name: &str) -> Option<&Validation> {
        self.validations_by_name.get(name)
    }

    pub fn rule(&self, key: &str) -> Option<&Rule> {
        self.rules_by_key.get(key)
    }

    pub fn default_fields(&self) -> &IndexMap<String, String> {
        &self.default_fields
    }

    pub fn is_default_field(&self, key: &str) -> bool {
        self.default_fields.contains_key(key)
    }

    pub fn is_required(&self, key: &str) -> bool {
        self.rule(key).is_some_and(|rule| rule.required)
    }

    /// Human label for a field key, falling back to the key itself.
    pub fn label(&self, key: &str) -> String {
        self.rule(key)
            .and_then(|rule| rule.label.as_deref())
            .filter(|label| !label.trim().is_empty())
            .unwrap_or(key)
            .to_string()
    }

    /// Explicitly excluded roots as declared by the schema.
    pub fn excluded_roots(&self) -> &[String] {
        &self.excluded
    }

    /// Transitive exclusion set for this schema.
    pub fn exclusion_set(&self) -> ExclusionSet {
        ExclusionSet::cascade(self)
    }

    /// Whether a leaf component with this type may ever be deactivated.
    pub fn is_removable_type(&self, component_type: &str) -> bool {
        let key = field_key(component_type);
        !self.is_required(key) && !self.is_default_field(key)
    }
}

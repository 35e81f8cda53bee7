//! Schema resolution: type graph to ordered leaf fields.
//!
//! One pass walks the schema's component list in declaration order and
//! expands every container depth-first. A `rendered` set keyed by component
//! type spans the whole pass, so a type reachable from several parents is
//! emitted once and cycles terminate. Lookup misses (undefined child types,
//! leaves without a validation) become empty placeholders and never abort
//! the pass.
//!
//! All pass state lives in the value returned by [`Resolver::resolve`];
//! resolving twice with the same inputs yields identical output.

use std::collections::HashSet;

use einvoice_model::{BaseType, Component, FieldKind, FieldPath, field_key};
use einvoice_schema::{ExclusionSet, TypeGraph};
use serde::Serialize;

use crate::pool::RemovablePool;

/// A renderable leaf field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    /// Payload key (component type without the `Type` suffix).
    pub field_key: String,
    /// Component type of the leaf.
    pub component_type: String,
    pub kind: FieldKind,
    pub base_type: BaseType,
    pub label: String,
    pub required: bool,
    /// Whether the field exposes a deactivate action.
    pub removable: bool,
    /// Chain of component types from the top-level component to this leaf.
    pub path: FieldPath,
}

impl FieldDescriptor {
    pub fn key_spec(&self) -> FieldKeySpec {
        FieldKeySpec {
            key: self.field_key.clone(),
            component_type: self.component_type.clone(),
            base_type: self.base_type,
            numeric: self.kind.is_numeric(),
            path: self.path.clone(),
        }
    }
}

/// A payload key the resolved schema requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldKeySpec {
    pub key: String,
    pub component_type: String,
    pub base_type: BaseType,
    /// Whether the field was resolved as a numeric input.
    pub numeric: bool,
    /// Where the field sits in the schema; locates its saved settings value.
    pub path: FieldPath,
}

/// Counters describing what a pass skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionStats {
    /// Types visited more than once and skipped after the first visit.
    pub duplicates: usize,
    /// Components skipped because they are in the exclusion cascade.
    pub excluded: usize,
    /// Leaves skipped because the user removed them.
    pub removed: usize,
    /// Undefined child types, self references and leaves without a validation.
    pub placeholders: usize,
}

/// Output of one resolver pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Resolution {
    pub fields: Vec<FieldDescriptor>,
    pub payload_keys: Vec<FieldKeySpec>,
    pub stats: ResolutionStats,
}

impl Resolution {
    pub fn field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.field_key == key)
    }

    pub fn key_spec(&self, key: &str) -> Option<&FieldKeySpec> {
        self.payload_keys.iter().find(|spec| spec.key == key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.key_spec(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Resolve a type graph against its exclusion set and the removable pool.
pub fn resolve(graph: &TypeGraph, excluded: &ExclusionSet, pool: &RemovablePool) -> Resolution {
    Resolver::new(graph, excluded, pool).resolve()
}

/// Borrowed inputs of a resolver pass.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    graph: &'a TypeGraph,
    excluded: &'a ExclusionSet,
    pool: &'a RemovablePool,
}

#[derive(Default)]
struct Pass {
    rendered: HashSet<String>,
    ancestors: Vec<String>,
    out: Resolution,
}

impl<'a> Resolver<'a> {
    pub fn new(graph: &'a TypeGraph, excluded: &'a ExclusionSet, pool: &'a RemovablePool) -> Self {
        Self {
            graph,
            excluded,
            pool,
        }
    }

    pub fn resolve(&self) -> Resolution {
        let mut pass = Pass::default();
        for component in self.graph.components() {
            self.visit(component, &mut pass);
        }

        let out = pass.out;
        tracing::debug!(
            fields = out.fields.len(),
            payload_keys = out.payload_keys.len(),
            duplicates = out.stats.duplicates,
            excluded = out.stats.excluded,
            removed = out.stats.removed,
            placeholders = out.stats.placeholders,
            "Resolved schema"
        );
        out
    }

    fn visit(&self, component: &Component, pass: &mut Pass) {
        let component_type = component.component_type.as_str();
        if !pass.rendered.insert(component_type.to_string()) {
            pass.out.stats.duplicates += 1;
            return;
        }
        if self.excluded.contains(component_type) {
            pass.out.stats.excluded += 1;
            return;
        }

        pass.ancestors.push(component_type.to_string());
        if component.is_leaf() {
            self.visit_leaf(component, pass);
        } else {
            for element in &component.elements {
                let target = element.target_type();
                if target == component_type {
                    pass.out.stats.placeholders += 1;
                    continue;
                }
                match self.graph.component(&target) {
                    Some(child) => self.visit(child, pass),
                    None => {
                        tracing::trace!(parent = component_type, child = %target, "Undefined child type");
                        pass.out.stats.placeholders += 1;
                    }
                }
            }
        }
        pass.ancestors.pop();
    }

    fn visit_leaf(&self, component: &Component, pass: &mut Pass) {
        let component_type = component.component_type.as_str();
        if self.pool.contains(component_type) {
            pass.out.stats.removed += 1;
            return;
        }
        let Some(validation) = self.graph.validation(component_type) else {
            tracing::trace!(leaf = component_type, "Leaf has no validation");
            pass.out.stats.placeholders += 1;
            return;
        };

        let key = field_key(component_type);
        let descriptor = FieldDescriptor {
            field_key: key.to_string(),
            component_type: component_type.to_string(),
            kind: FieldKind::from_validation(validation),
            base_type: validation.base_type,
            label: self.graph.label(key),
            required: self.graph.is_required(key),
            removable: self.graph.is_removable_type(component_type),
            path: FieldPath::from_segments(&pass.ancestors),
        };
        pass.out.payload_keys.push(descriptor.key_spec());
        pass.out.fields.push(descriptor);
    }
}

#[cfg(test)]
mod tests {
    use einvoice_model::{Rule, SchemaDocument, Validation};

    use super::*;

    fn run(schema: SchemaDocument, pool: &RemovablePool) -> Resolution {
        let graph = TypeGraph::build(schema);
        let excluded = graph.exclusion_set();
        resolve(&graph, &excluded, pool)
    }

    #[test]
    fn self_reference_is_a_placeholder() {
        let schema = SchemaDocument {
            validations: vec![Validation::new("NoteType", BaseType::String)],
            components: vec![
                Component::container("LoopType", ["Loop", "Note"]),
                Component::leaf("NoteType"),
            ],
            ..SchemaDocument::default()
        };
        let resolution = run(schema, &RemovablePool::new());
        assert_eq!(resolution.fields.len(), 1);
        assert_eq!(resolution.fields[0].path.as_str(), "LoopType|NoteType");
        assert_eq!(resolution.stats.placeholders, 1);
    }

    #[test]
    fn label_falls_back_to_key() {
        let schema = SchemaDocument {
            rules: vec![Rule {
                label: None,
                ..Rule::new("Note", "", true)
            }],
            validations: vec![Validation::new("NoteType", BaseType::String)],
            components: vec![Component::leaf("NoteType")],
            ..SchemaDocument::default()
        };
        let resolution = run(schema, &RemovablePool::new());
        assert_eq!(resolution.fields[0].label, "Note");
        assert!(resolution.fields[0].required);
        assert!(!resolution.fields[0].removable);
    }
}

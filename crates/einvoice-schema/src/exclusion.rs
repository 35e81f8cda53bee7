//! Transitive exclusion of component sub-trees.

use std::collections::{BTreeSet, VecDeque};

use crate::graph::TypeGraph;

/// Component types that can never contribute a field.
///
/// Computed by following `elements` from every explicitly excluded root.
/// Undefined child types are still recorded so a later lookup by type stays
/// consistent; cycles terminate because each type is expanded once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    types: BTreeSet<String>,
}

impl ExclusionSet {
    pub fn cascade(graph: &TypeGraph) -> Self {
        let mut types = BTreeSet::new();
        let mut queue: VecDeque<String> = graph.excluded_roots().iter().cloned().collect();

        while let Some(component_type) = queue.pop_front() {
            if !types.insert(component_type.clone()) {
                continue;
            }
            let Some(component) = graph.component(&component_type) else {
                continue;
            };
            for element in &component.elements {
                let child = element.target_type();
                if !types.contains(&child) {
                    queue.push_back(child);
                }
            }
        }

        tracing::debug!(
            roots = graph.excluded_roots().len(),
            excluded = types.len(),
            "Computed exclusion cascade"
        );
        Self { types }
    }

    pub fn contains(&self, component_type: &str) -> bool {
        self.types.contains(component_type)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(String::as_str)
    }
}

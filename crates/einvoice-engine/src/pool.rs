//! Optional fields the user has deactivated.

use std::collections::BTreeSet;

/// Component types currently deactivated by the user.
///
/// Only optional, non-default leaves are admitted; the [`Engine`](crate::Engine)
/// enforces that before inserting. Membership is session-local and cleared
/// on every schema change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovablePool {
    types: BTreeSet<String>,
}

impl RemovablePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the type was not already in the pool.
    pub fn insert(&mut self, component_type: impl Into<String>) -> bool {
        self.types.insert(component_type.into())
    }

    /// Returns `true` if the type was in the pool.
    pub fn remove(&mut self, component_type: &str) -> bool {
        self.types.remove(component_type)
    }

    pub fn contains(&self, component_type: &str) -> bool {
        self.types.contains(component_type)
    }

    pub fn clear(&mut self) {
        self.types.clear();
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

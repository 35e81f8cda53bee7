//! Nested settings objects that seed initial values and are pruned when an
//! optional field is removed.
//!
//! The engine works against exactly one target: the company-level e-invoice
//! defaults or one entity's e-invoice override. It does not care which; it
//! only calls [`SettingsStore::get_path`] and [`SettingsStore::remove_path`]
//! with a dotted path.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Dotted-path access to the active settings object.
pub trait SettingsStore {
    /// Remove the value at a dotted path. Returns `true` if something was
    /// removed.
    fn remove_path(&mut self, dotted: &str) -> bool;

    /// Value at a dotted path, if present.
    fn get_path(&self, dotted: &str) -> Option<&Value>;
}

/// A settings object held as nested JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonSettings {
    root: Value,
}

impl Default for JsonSettings {
    fn default() -> Self {
        Self {
            root: Value::Object(Map::new()),
        }
    }
}

impl JsonSettings {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    pub fn into_value(self) -> Value {
        self.root
    }
}

fn split_path(dotted: &str) -> Option<(Vec<&str>, &str)> {
    let mut segments: Vec<&str> = dotted.split('.').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return None;
    }
    let leaf = segments.pop()?;
    Some((segments, leaf))
}

impl SettingsStore for JsonSettings {
    fn remove_path(&mut self, dotted: &str) -> bool {
        let Some((parents, leaf)) = split_path(dotted) else {
            return false;
        };
        let mut node = &mut self.root;
        for segment in parents {
            match node.get_mut(segment) {
                Some(child) => node = child,
                None => return false,
            }
        }
        node.as_object_mut()
            .and_then(|object| object.remove(leaf))
            .is_some()
    }

    fn get_path(&self, dotted: &str) -> Option<&Value> {
        let (parents, leaf) = split_path(dotted)?;
        let mut node = &self.root;
        for segment in parents {
            node = node.get(segment)?;
        }
        node.get(leaf)
    }
}

/// Which settings object is the active pruning target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "target", content = "id", rename_all = "lowercase")]
pub enum SettingsTarget {
    /// Company-level e-invoice defaults.
    #[default]
    Company,
    /// A specific entity's e-invoice override.
    Entity(String),
}

/// Company defaults plus per-entity overrides, pruned through one active
/// target.
#[derive(Debug, Clone, Default)]
pub struct SettingsBackend {
    company: JsonSettings,
    entities: BTreeMap<String, JsonSettings>,
    target: SettingsTarget,
}

impl SettingsBackend {
    pub fn new(company: JsonSettings) -> Self {
        Self {
            company,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_entity(mut self, id: impl Into<String>, settings: JsonSettings) -> Self {
        self.entities.insert(id.into(), settings);
        self
    }

    pub fn target(&self) -> &SettingsTarget {
        &self.target
    }

    pub fn set_target(&mut self, target: SettingsTarget) {
        tracing::debug!(settings_target = ?target, "Switched settings target");
        self.target = target;
    }

    pub fn company(&self) -> &JsonSettings {
        &self.company
    }

    pub fn entity(&self, id: &str) -> Option<&JsonSettings> {
        self.entities.get(id)
    }

    fn active(&self) -> Option<&JsonSettings> {
        match &self.target {
            SettingsTarget::Company => Some(&self.company),
            SettingsTarget::Entity(id) => self.entities.get(id),
        }
    }

    fn active_mut(&mut self) -> Option<&mut JsonSettings> {
        match &self.target {
            SettingsTarget::Company => Some(&mut self.company),
            SettingsTarget::Entity(id) => self.entities.get_mut(id),
        }
    }
}

impl SettingsStore for SettingsBackend {
    fn remove_path(&mut self, dotted: &str) -> bool {
        match self.active_mut() {
            Some(settings) => settings.remove_path(dotted),
            None => {
                tracing::warn!(
                    settings_target = ?self.target,
                    "Settings target has no settings object"
                );
                false
            }
        }
    }

    fn get_path(&self, dotted: &str) -> Option<&Value> {
        self.active()?.get_path(dotted)
    }
}

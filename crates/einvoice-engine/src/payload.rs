//! The flat `key -> value` map backing the form.

use einvoice_model::FieldValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::pool::RemovablePool;
use crate::resolver::{FieldDescriptor, FieldKeySpec};
use crate::settings::SettingsStore;

/// Ordered payload handed to the save/submit call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(IndexMap<String, FieldValue>);

impl Payload {
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Keys added and dropped by a [`PayloadManager::reconcile`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub added: Vec<String>,
    pub dropped: Vec<String>,
}

impl ReconcileReport {
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.dropped.is_empty()
    }
}

/// Owns the payload and applies the optional-field lifecycle to it.
#[derive(Debug, Clone, Default)]
pub struct PayloadManager {
    payload: Payload,
}

impl PayloadManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn clear(&mut self) {
        self.payload.0.clear();
    }

    /// Replace the payload with one entry per resolved key.
    ///
    /// A key takes the value saved in the active settings target when there
    /// is one, then its schema default, then `0` when it was resolved as
    /// numeric and `""` otherwise.
    pub fn initialize(
        &mut self,
        payload_keys: &[FieldKeySpec],
        default_fields: &IndexMap<String, String>,
        settings: &dyn SettingsStore,
    ) {
        self.payload.0 = payload_keys
            .iter()
            .map(|spec| {
                let value = initial_value(spec, default_fields, settings);
                (spec.key.clone(), value)
            })
            .collect();
    }

    /// Overwrite a value. No validation happens here.
    pub fn set_field(&mut self, key: impl Into<String>, value: FieldValue) {
        self.payload.0.insert(key.into(), value);
    }

    /// Put a removed optional field back.
    ///
    /// The key gets the default for its base type (`false`, `0` or `""`) and
    /// its component type leaves the pool.
    pub fn activate_optional_field(&mut self, spec: &FieldKeySpec, pool: &mut RemovablePool) {
        self.payload
            .0
            .insert(spec.key.clone(), FieldValue::activation_default(spec.base_type));
        pool.remove(&spec.component_type);
        tracing::debug!(key = %spec.key, "Activated optional field");
    }

    /// Take an optional field off the form.
    ///
    /// Drops the key, records the component type in the pool, and prunes the
    /// field from the active settings target at the field's deletion path.
    /// Returns whether the settings object held a value at that path.
    pub fn deactivate_optional_field(
        &mut self,
        field: &FieldDescriptor,
        pool: &mut RemovablePool,
        settings: &mut dyn SettingsStore,
    ) -> bool {
        self.payload.0.shift_remove(&field.field_key);
        pool.insert(field.component_type.clone());
        let deletion_path = field.path.settings_deletion_path();
        let pruned = settings.remove_path(&deletion_path);
        tracing::debug!(
            key = %field.field_key,
            settings_path = %deletion_path,
            pruned,
            "Deactivated optional field"
        );
        pruned
    }

    /// Bring the payload in line with a fresh resolution.
    ///
    /// Keys that stopped resolving are dropped, newly resolvable keys are
    /// created with their initial value (see [`initialize`](Self::initialize)),
    /// and existing values are kept. The result follows the resolver's key
    /// order.
    pub fn reconcile(
        &mut self,
        payload_keys: &[FieldKeySpec],
        default_fields: &IndexMap<String, String>,
        settings: &dyn SettingsStore,
    ) -> ReconcileReport {
        let mut previous = std::mem::take(&mut self.payload.0);
        let mut report = ReconcileReport::default();

        for spec in payload_keys {
            let value = match previous.shift_remove(&spec.key) {
                Some(value) => value,
                None => {
                    report.added.push(spec.key.clone());
                    initial_value(spec, default_fields, settings)
                }
            };
            self.payload.0.insert(spec.key.clone(), value);
        }
        report.dropped = previous.into_keys().collect();
        report
    }
}

fn initial_value(
    spec: &FieldKeySpec,
    default_fields: &IndexMap<String, String>,
    settings: &dyn SettingsStore,
) -> FieldValue {
    let saved = settings
        .get_path(&spec.path.settings_deletion_path())
        .and_then(FieldValue::from_json);
    if let Some(value) = saved {
        return value;
    }
    match default_fields.get(&spec.key) {
        Some(default) => FieldValue::Text(default.clone()),
        None if spec.numeric => FieldValue::Number(0.0),
        None => FieldValue::Text(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use einvoice_model::{BaseType, FieldPath};
    use serde_json::json;

    use super::*;
    use crate::settings::JsonSettings;

    fn spec(key: &str, base_type: BaseType) -> FieldKeySpec {
        FieldKeySpec {
            key: key.to_string(),
            component_type: format!("{key}Type"),
            base_type,
            numeric: base_type.is_numeric(),
            path: FieldPath::from_segments(["InvoiceType".to_string(), format!("{key}Type")]),
        }
    }

    #[test]
    fn initialize_prefers_defaults_then_kind() {
        let mut manager = PayloadManager::new();
        let defaults = IndexMap::from([("Currency".to_string(), "MYR".to_string())]);
        manager.initialize(
            &[
                spec("Currency", BaseType::String),
                spec("Total", BaseType::Decimal),
                spec("Paid", BaseType::Boolean),
            ],
            &defaults,
            &JsonSettings::default(),
        );
        let payload = manager.payload();
        assert_eq!(payload.get("Currency"), Some(&FieldValue::from("MYR")));
        assert_eq!(payload.get("Total"), Some(&FieldValue::Number(0.0)));
        assert_eq!(payload.get("Paid"), Some(&FieldValue::from("")));
    }

    #[test]
    fn reconcile_keeps_values_and_follows_resolver_order() {
        let mut manager = PayloadManager::new();
        let defaults = IndexMap::new();
        manager.initialize(
            &[spec("A", BaseType::String), spec("B", BaseType::String)],
            &defaults,
            &JsonSettings::default(),
        );
        manager.set_field("A", FieldValue::from("kept"));

        let report = manager.reconcile(
            &[spec("C", BaseType::Number), spec("A", BaseType::String)],
            &defaults,
            &JsonSettings::default(),
        );
        assert_eq!(report.added, ["C"]);
        assert_eq!(report.dropped, ["B"]);
        let keys: Vec<&str> = manager.payload().keys().collect();
        assert_eq!(keys, ["C", "A"]);
        assert_eq!(manager.payload().get("A"), Some(&FieldValue::from("kept")));
    }

    #[test]
    fn saved_settings_win_over_schema_defaults() {
        let mut manager = PayloadManager::new();
        let defaults = IndexMap::from([("Currency".to_string(), "MYR".to_string())]);
        let settings = JsonSettings::new(json!({
            "InvoiceType": {"CurrencyType": "USD", "TotalType": 12.5, "NoteType": null}
        }));
        manager.initialize(
            &[
                spec("Currency", BaseType::String),
                spec("Total", BaseType::Decimal),
                spec("Note", BaseType::String),
            ],
            &defaults,
            &settings,
        );
        let payload = manager.payload();
        assert_eq!(payload.get("Currency"), Some(&FieldValue::from("USD")));
        assert_eq!(payload.get("Total"), Some(&FieldValue::Number(12.5)));
        assert_eq!(payload.get("Note"), Some(&FieldValue::from("")));
    }

    #[test]
    fn reconcile_seeds_added_keys_from_settings() {
        let mut manager = PayloadManager::new();
        let defaults = IndexMap::new();
        let settings = JsonSettings::new(json!({"InvoiceType": {"BType": "saved"}}));
        manager.initialize(&[spec("A", BaseType::String)], &defaults, &settings);
        manager.set_field("A", FieldValue::from("edited"));

        let report = manager.reconcile(
            &[spec("A", BaseType::String), spec("B", BaseType::String)],
            &defaults,
            &settings,
        );
        assert_eq!(report.added, ["B"]);
        assert_eq!(manager.payload().get("A"), Some(&FieldValue::from("edited")));
        assert_eq!(manager.payload().get("B"), Some(&FieldValue::from("saved")));
    }
}

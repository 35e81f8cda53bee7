//! One form session: schema, resolution, payload and removable pool.
//!
//! Every mutation runs to completion before returning: a pool change
//! triggers a fresh resolver pass and the payload is reconciled against it
//! in the same call, so `payload.keys()` always equals the resolved payload
//! keys between calls.
//!
//! Schema loads are split into [`Engine::begin_load`] and
//! [`Engine::finish_load`] so a slow fetch can be superseded. Each begin
//! hands out a [`LoadTicket`]; only the latest ticket is honoured, and only
//! once. A late or repeated result is dropped.
//!
//! Initial values come from the active settings target first, then the
//! schema's default fields.

use einvoice_model::{
    BaseType, CountryCode, DropdownOption, FieldKind, FieldPath, FieldValue, SchemaDocument,
    field_key,
};
use einvoice_schema::{ExclusionSet, SchemaError, SchemaLoader, TypeGraph};
use serde::Serialize;

use crate::config::{EngineConfig, NumericPolicy};
use crate::error::{EngineError, NotRemovableReason, Result};
use crate::payload::{Payload, PayloadManager};
use crate::pool::RemovablePool;
use crate::presenter::{DisplayLine, ValidationErrors, ValidationPresenter};
use crate::resolver::{FieldDescriptor, FieldKeySpec, Resolution, resolve};
use crate::settings::{SettingsBackend, SettingsStore};

/// Handle for one in-flight schema load. Consumed by
/// [`Engine::finish_load`].
#[derive(Debug, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    country: CountryCode,
}

impl LoadTicket {
    pub fn country(&self) -> &CountryCode {
        &self.country
    }
}

/// What [`Engine::finish_load`] did with a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The schema is now active.
    Applied,
    /// A newer load was started or this one was already finished; the
    /// result was ignored.
    Stale,
}

/// A field together with its current payload value, as handed to the
/// rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView<'a> {
    pub field_key: &'a str,
    /// `select`, `number`, `date` or `text`.
    pub kind: &'static str,
    /// Choices of a `select` field.
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub options: &'a [DropdownOption],
    pub label: &'a str,
    pub required: bool,
    pub removable: bool,
    pub value: Option<&'a FieldValue>,
}

/// A removed optional field that can be re-added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovedField {
    pub field_key: String,
    pub component_type: String,
    pub label: String,
}

/// Counts describing the current session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngineSummary {
    pub fields: usize,
    pub required: usize,
    pub removable: usize,
    pub removed: usize,
    pub excluded_types: usize,
}

/// E-invoice form session.
#[derive(Debug)]
pub struct Engine<S = SettingsBackend> {
    config: EngineConfig,
    settings: S,
    generation: u64,
    /// Generation of the load still waiting for its result.
    pending: Option<u64>,
    loaded: bool,
    country: Option<CountryCode>,
    graph: TypeGraph,
    excluded: ExclusionSet,
    pool: RemovablePool,
    resolution: Resolution,
    payload: PayloadManager,
}

impl Engine<SettingsBackend> {
    /// Engine pruning an empty company settings object.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_settings(config, SettingsBackend::default())
    }
}

impl Default for Engine<SettingsBackend> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<S: SettingsStore> Engine<S> {
    pub fn with_settings(config: EngineConfig, settings: S) -> Self {
        Self {
            config,
            settings,
            generation: 0,
            pending: None,
            loaded: false,
            country: None,
            graph: TypeGraph::default(),
            excluded: ExclusionSet::default(),
            pool: RemovablePool::new(),
            resolution: Resolution::default(),
            payload: PayloadManager::new(),
        }
    }

    // ------------------------------------------------------------------
    // Schema lifecycle
    // ------------------------------------------------------------------

    /// Start loading a country's schema.
    ///
    /// All engine state is discarded immediately; the engine stays empty
    /// until the matching [`finish_load`](Self::finish_load).
    pub fn begin_load(&mut self, country: CountryCode) -> LoadTicket {
        self.generation += 1;
        self.pending = Some(self.generation);
        self.reset();
        tracing::info!(country = %country, generation = self.generation, "Loading schema");
        LoadTicket {
            generation: self.generation,
            country,
        }
    }

    /// Apply the result of a load started with [`begin_load`](Self::begin_load).
    ///
    /// A superseded ticket is ignored, as is a second result for a ticket
    /// that was already finished. A failed load leaves the engine empty.
    ///
    /// # Errors
    ///
    /// Returns the load error when the ticket is current and the load failed.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: std::result::Result<SchemaDocument, SchemaError>,
    ) -> Result<LoadOutcome> {
        if self.pending != Some(ticket.generation) {
            tracing::warn!(
                country = %ticket.country,
                ticket = ticket.generation,
                current = self.generation,
                "Discarding stale schema load"
            );
            return Ok(LoadOutcome::Stale);
        }
        self.pending = None;
        match result {
            Ok(schema) => {
                self.apply_schema(schema);
                self.country = Some(ticket.country);
                Ok(LoadOutcome::Applied)
            }
            Err(error) => {
                tracing::error!(country = %ticket.country, %error, "Schema load failed");
                self.reset();
                Err(error.into())
            }
        }
    }

    /// Load a country's schema synchronously.
    pub fn load(&mut self, loader: &impl SchemaLoader, country: CountryCode) -> Result<()> {
        let ticket = self.begin_load(country);
        let result = loader.load(ticket.country());
        self.finish_load(ticket, result).map(|_| ())
    }

    /// Use a schema document that did not come from a country loader.
    pub fn load_document(&mut self, schema: SchemaDocument) {
        self.generation += 1;
        self.pending = None;
        self.reset();
        self.apply_schema(schema);
    }

    fn reset(&mut self) {
        self.loaded = false;
        self.country = None;
        self.graph = TypeGraph::default();
        self.excluded = ExclusionSet::default();
        self.pool.clear();
        self.resolution = Resolution::default();
        self.payload.clear();
    }

    fn apply_schema(&mut self, schema: SchemaDocument) {
        self.graph = TypeGraph::build(schema);
        self.excluded = self.graph.exclusion_set();
        self.pool.clear();
        self.resolution = resolve(&self.graph, &self.excluded, &self.pool);
        self.payload.initialize(
            &self.resolution.payload_keys,
            self.graph.default_fields(),
            &self.settings,
        );
        self.loaded = true;
        tracing::info!(
            fields = self.resolution.fields.len(),
            excluded_types = self.excluded.len(),
            "Schema applied"
        );
    }

    fn reresolve(&mut self) {
        self.resolution = resolve(&self.graph, &self.excluded, &self.pool);
        let report = self.payload.reconcile(
            &self.resolution.payload_keys,
            self.graph.default_fields(),
            &self.settings,
        );
        if !report.is_unchanged() {
            tracing::debug!(
                added = ?report.added,
                dropped = ?report.dropped,
                "Reconciled payload"
            );
        }
    }

    fn ensure_loaded(&self) -> Result<()> {
        if !self.loaded {
            return Err(EngineError::NoSchema);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn country(&self) -> Option<&CountryCode> {
        self.country.as_ref()
    }

    pub fn graph(&self) -> &TypeGraph {
        &self.graph
    }

    pub fn exclusion_set(&self) -> &ExclusionSet {
        &self.excluded
    }

    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.resolution.fields
    }

    pub fn payload(&self) -> &Payload {
        self.payload.payload()
    }

    pub fn pool(&self) -> &RemovablePool {
        &self.pool
    }

    pub fn settings(&self) -> &S {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut S {
        &mut self.settings
    }

    /// Fields joined with their current values, in resolution order.
    pub fn field_views(&self) -> Vec<FieldView<'_>> {
        self.resolution
            .fields
            .iter()
            .map(|field| FieldView {
                field_key: &field.field_key,
                kind: field.kind.widget(),
                options: field.kind.options(),
                label: &field.label,
                required: field.required,
                removable: field.removable,
                value: self.payload.payload().get(&field.field_key),
            })
            .collect()
    }

    /// Removed fields for a re-add selector, in schema declaration order.
    pub fn removed_fields(&self) -> Vec<RemovedField> {
        let mut removed: Vec<RemovedField> = self
            .pool
            .iter()
            .map(|component_type| {
                let key = field_key(component_type);
                RemovedField {
                    field_key: key.to_string(),
                    component_type: component_type.to_string(),
                    label: self.graph.label(key),
                }
            })
            .collect();
        removed.sort_by_key(|field| self.graph.position(&field.component_type));
        removed
    }

    pub fn summary(&self) -> EngineSummary {
        let fields = &self.resolution.fields;
        EngineSummary {
            fields: fields.len(),
            required: fields.iter().filter(|field| field.required).count(),
            removable: fields.iter().filter(|field| field.removable).count(),
            removed: self.pool.len(),
            excluded_types: self.excluded.len(),
        }
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    /// Overwrite a resolved field's value as-is.
    pub fn set_field(&mut self, key: &str, value: FieldValue) -> Result<()> {
        self.ensure_loaded()?;
        if !self.resolution.contains_key(key) {
            return Err(EngineError::UnknownField {
                key: key.to_string(),
            });
        }
        self.payload.set_field(key, value);
        Ok(())
    }

    /// Store user input, coercing it by the field's kind.
    ///
    /// Numeric fields are parsed as floats; unparsable text is handled by
    /// the configured [`NumericPolicy`]. Other kinds store the text.
    pub fn set_input(&mut self, key: &str, raw: &str) -> Result<()> {
        self.ensure_loaded()?;
        let Some(field) = self.resolution.field(key) else {
            return Err(EngineError::UnknownField {
                key: key.to_string(),
            });
        };
        let value = if field.kind.is_numeric() {
            match (FieldValue::parse_number(raw), self.config.numeric_policy) {
                (Some(number), _) => FieldValue::Number(number),
                (None, NumericPolicy::Reject) => {
                    return Err(EngineError::InvalidNumber {
                        key: key.to_string(),
                        input: raw.to_string(),
                    });
                }
                (None, NumericPolicy::Zero) => FieldValue::Number(0.0),
                (None, NumericPolicy::KeepRaw) => FieldValue::Text(raw.to_string()),
            }
        } else if field.base_type == BaseType::Boolean && field.kind == FieldKind::Text {
            match raw.trim() {
                "true" => FieldValue::Bool(true),
                "false" => FieldValue::Bool(false),
                _ => FieldValue::Text(raw.to_string()),
            }
        } else {
            FieldValue::Text(raw.to_string())
        };
        self.payload.set_field(key, value);
        Ok(())
    }

    /// Deactivate an optional field.
    ///
    /// # Errors
    ///
    /// Fails for unknown keys and for required or default fields.
    pub fn remove_optional_field(&mut self, key: &str) -> Result<()> {
        self.ensure_loaded()?;
        let Some(field) = self.resolution.field(key) else {
            return Err(EngineError::UnknownField {
                key: key.to_string(),
            });
        };
        if field.required {
            return Err(EngineError::NotRemovable {
                key: key.to_string(),
                reason: NotRemovableReason::Required,
            });
        }
        if self.graph.is_default_field(key) {
            return Err(EngineError::NotRemovable {
                key: key.to_string(),
                reason: NotRemovableReason::DefaultField,
            });
        }
        let field = field.clone();
        self.payload
            .deactivate_optional_field(&field, &mut self.pool, &mut self.settings);
        self.reresolve();
        tracing::info!(key, removed = self.pool.len(), "Removed optional field");
        Ok(())
    }

    /// Re-add a previously removed optional field with its default value.
    ///
    /// # Errors
    ///
    /// Fails when the key is not in the removable pool.
    pub fn restore_optional_field(&mut self, key: &str) -> Result<()> {
        self.ensure_loaded()?;
        let Some(component_type) = self
            .pool
            .iter()
            .find(|component_type| field_key(component_type) == key)
            .map(str::to_string)
        else {
            return Err(EngineError::NotRemoved {
                key: key.to_string(),
            });
        };
        let validation = self.graph.validation(&component_type);
        let spec = FieldKeySpec {
            key: key.to_string(),
            numeric: validation
                .is_some_and(|validation| FieldKind::from_validation(validation).is_numeric()),
            base_type: validation.map(|validation| validation.base_type).unwrap_or_default(),
            component_type,
            path: FieldPath::default(),
        };
        self.payload.activate_optional_field(&spec, &mut self.pool);
        self.reresolve();
        tracing::info!(key, removed = self.pool.len(), "Restored optional field");
        Ok(())
    }

    /// Present server validation errors for this session.
    pub fn present_errors(&self, errors: &ValidationErrors) -> Vec<DisplayLine> {
        ValidationPresenter::present(errors)
    }
}

//! Field engine for country-specific e-invoice forms.
//!
//! The engine turns a schema document into an ordered list of input fields
//! and keeps the payload behind those fields in step with the schema and
//! with the user's choice of optional fields.
//!
//! # Module Organization
//!
//! - [`resolver`]: walks the type graph and yields renderable leaf fields
//!   plus the payload keys they require
//! - [`pool`]: [`RemovablePool`], optional fields the user has deactivated
//! - [`payload`]: [`PayloadManager`], the flat `key -> value` map
//! - [`settings`]: nested settings objects that seed values and are pruned
//!   on removal
//! - [`presenter`]: [`ValidationPresenter`], server errors as display lines
//! - [`engine`]: [`Engine`], one form session tying the above together
//!
//! # Example
//!
//! ```rust,ignore
//! use einvoice_engine::{Engine, EngineConfig};
//! use einvoice_schema::FsSchemaLoader;
//!
//! let mut engine = Engine::new(EngineConfig::default());
//! engine.load(&FsSchemaLoader::from_env(), "MY".parse()?)?;
//!
//! engine.set_input("InvoiceNumber", "INV-0001")?;
//! engine.remove_optional_field("Note")?;
//!
//! let payload = serde_json::to_string(engine.payload())?;
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod engine;
pub mod error;
pub mod payload;
pub mod pool;
pub mod presenter;
pub mod resolver;
pub mod settings;

pub use config::{EngineConfig, NumericPolicy};
pub use engine::{Engine, EngineSummary, FieldView, LoadOutcome, LoadTicket, RemovedField};
pub use error::{EngineError, NotRemovableReason, Result};
pub use payload::{Payload, PayloadManager, ReconcileReport};
pub use pool::RemovablePool;
pub use presenter::{DisplayLine, ValidationErrors, ValidationPresenter};
pub use resolver::{FieldDescriptor, FieldKeySpec, Resolution, ResolutionStats, Resolver, resolve};
pub use settings::{JsonSettings, SettingsBackend, SettingsStore, SettingsTarget};

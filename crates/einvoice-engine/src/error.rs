//! Error types for engine operations.
//!
//! Graph lookup misses and malformed schemas never surface here; they are
//! absorbed by the resolver. What remains are caller mistakes (unknown keys,
//! removing a mandatory field, unparsable numbers) and schema loading
//! failures.

use std::fmt;

use einvoice_schema::SchemaError;
use thiserror::Error;

/// Why a field cannot enter the removable pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotRemovableReason {
    /// The field's rule marks it required.
    Required,
    /// The schema supplies a default value for the field.
    DefaultField,
}

impl fmt::Display for NotRemovableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => f.write_str("field is required"),
            Self::DefaultField => f.write_str("field has a schema default"),
        }
    }
}

/// Unified error type for engine operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum EngineError {
    /// No schema has been loaded yet.
    #[error("No schema loaded")]
    NoSchema,

    /// Field key is not part of the current resolution.
    #[error("Unknown field: {key}")]
    UnknownField {
        /// The field key that was not found.
        key: String,
    },

    /// Field may not be deactivated.
    #[error("Cannot remove field '{key}': {reason}")]
    NotRemovable {
        /// The field key.
        key: String,
        /// Why removal was refused.
        reason: NotRemovableReason,
    },

    /// Field is not in the removable pool, so it cannot be re-added.
    #[error("Field '{key}' has not been removed")]
    NotRemoved {
        /// The field key.
        key: String,
    },

    /// Numeric field received text that is not a number.
    #[error("Invalid number for {key}: '{input}'")]
    InvalidNumber {
        /// The numeric field key.
        key: String,
        /// The rejected input.
        input: String,
    },

    /// Engine configuration could not be read.
    #[error("Invalid engine configuration {origin}: {message}")]
    Config {
        /// Where the configuration came from.
        origin: String,
        /// Description of the problem.
        message: String,
    },

    /// Schema loading error.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    /// Check if this error is recoverable (user can fix and retry).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::UnknownField { .. }
                | Self::NotRemovable { .. }
                | Self::NotRemoved { .. }
                | Self::InvalidNumber { .. }
        )
    }

    /// Get a user-friendly suggestion for fixing this error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::NoSchema => Some("Load a country schema before editing fields."),
            Self::UnknownField { .. } => {
                Some("Check the field key against the fields resolved for this schema.")
            }
            Self::NotRemovable {
                reason: NotRemovableReason::Required,
                ..
            } => Some("Required fields must stay on the form."),
            Self::NotRemovable {
                reason: NotRemovableReason::DefaultField,
                ..
            } => Some("Fields with a schema default cannot be removed."),
            Self::NotRemoved { .. } => Some("Only removed optional fields can be re-added."),
            Self::InvalidNumber { .. } => Some("Enter a plain decimal number, e.g. 1250.50."),
            Self::Config { .. } => Some("Check the configuration file syntax."),
            Self::Schema(_) => Some("Verify the schema directory and country code."),
        }
    }
}

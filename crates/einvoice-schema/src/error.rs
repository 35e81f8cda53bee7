//! Error types for schema loading.

use std::path::PathBuf;

use einvoice_model::{CountryCode, ModelError};
use thiserror::Error;

/// Errors that can occur when loading a schema document.
///
/// Lookup misses inside a loaded graph are not errors; they resolve to
/// "not found".
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SchemaError {
    /// Schema directory not found.
    #[error("Schema directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// No schema published for the requested country.
    #[error("No schema for country {country} (looked for {path})")]
    NotFound { country: CountryCode, path: PathBuf },

    /// Failed to read a schema file.
    #[error("Failed to read schema {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Schema content is not a valid schema document.
    #[error("Failed to parse schema {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// Country code rejected before any lookup.
    #[error(transparent)]
    InvalidCountry(#[from] ModelError),
}

impl SchemaError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;

//! Schema directory path resolution.

use std::path::PathBuf;

use einvoice_model::CountryCode;

/// Environment variable for overriding the schema directory.
pub const SCHEMA_ENV_VAR: &str = "EINVOICE_SCHEMA_DIR";

/// Get the schema root directory.
///
/// Resolution order:
/// 1. `EINVOICE_SCHEMA_DIR` environment variable
/// 2. `schemas/` directory relative to workspace root
pub fn schema_root() -> PathBuf {
    if let Ok(root) = std::env::var(SCHEMA_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../schemas")
}

/// File name of a country's schema document.
pub fn schema_file_name(country: &CountryCode) -> String {
    format!("{}.json", country.as_str())
}

//! Engine configuration.

use std::path::{Path, PathBuf};

use einvoice_schema::FsSchemaLoader;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// What happens when a numeric field receives text that is not a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NumericPolicy {
    /// Refuse the input and leave the payload unchanged.
    #[default]
    Reject,
    /// Store `0`.
    Zero,
    /// Store the text verbatim and let the server reject it.
    KeepRaw,
}

/// Configuration for an [`Engine`](crate::Engine) session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EngineConfig {
    /// Policy for unparsable numeric input.
    pub numeric_policy: NumericPolicy,
    /// Schema directory; falls back to `EINVOICE_SCHEMA_DIR` or the
    /// workspace `schemas/` directory.
    pub schema_dir: Option<PathBuf>,
}

impl EngineConfig {
    /// Read a JSON configuration file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let origin = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| EngineError::Config {
            origin: origin.clone(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| EngineError::Config {
            origin,
            message: e.to_string(),
        })
    }

    #[must_use]
    pub fn with_numeric_policy(mut self, policy: NumericPolicy) -> Self {
        self.numeric_policy = policy;
        self
    }

    #[must_use]
    pub fn with_schema_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.schema_dir = dir;
        self
    }

    /// Filesystem loader for the configured schema directory.
    pub fn schema_loader(&self) -> FsSchemaLoader {
        match &self.schema_dir {
            Some(dir) => FsSchemaLoader::new(dir),
            None => FsSchemaLoader::from_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_reads_kebab_case_keys() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"numeric-policy":"keep-raw","schema-dir":"/srv/schemas"}"#)
                .unwrap();
        assert_eq!(config.numeric_policy, NumericPolicy::KeepRaw);
        assert_eq!(config.schema_dir, Some(PathBuf::from("/srv/schemas")));
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.numeric_policy, NumericPolicy::Reject);
    }
}

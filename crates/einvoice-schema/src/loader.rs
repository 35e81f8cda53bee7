//! Per-country schema loading.
//!
//! The engine only sees [`SchemaLoader`]; where documents come from is up to
//! the implementation. [`FsSchemaLoader`] reads `<root>/<COUNTRY>.json` and
//! [`StaticSchemaLoader`] serves documents held in memory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use einvoice_model::{CountryCode, SchemaDocument};

use crate::error::{Result, SchemaError};
use crate::paths::{schema_file_name, schema_root};

/// Source of schema documents keyed by country.
pub trait SchemaLoader {
    /// Load the schema for a country.
    ///
    /// # Errors
    ///
    /// Returns an error when no document exists for the country or it
    /// cannot be read or parsed.
    fn load(&self, country: &CountryCode) -> Result<SchemaDocument>;
}

/// Parse a schema document from JSON text.
///
/// `origin` names the source in error messages.
pub fn parse_schema(content: &str, origin: &str) -> Result<SchemaDocument> {
    serde_json::from_str(content).map_err(|source| SchemaError::Json {
        origin: origin.to_string(),
        source,
    })
}

/// Read and parse a schema document from a file.
pub fn load_schema_file(path: &Path) -> Result<SchemaDocument> {
    let content = std::fs::read_to_string(path).map_err(|e| SchemaError::io(path, e))?;
    let schema = parse_schema(&content, &path.display().to_string())?;
    tracing::info!(
        path = %path.display(),
        components = schema.components.len(),
        validations = schema.validations.len(),
        rules = schema.rules.len(),
        "Loaded schema file"
    );
    Ok(schema)
}

/// Loads `<root>/<COUNTRY>.json` from disk.
#[derive(Debug, Clone)]
pub struct FsSchemaLoader {
    root: PathBuf,
}

impl FsSchemaLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Loader rooted at [`schema_root`].
    pub fn from_env() -> Self {
        Self::new(schema_root())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, country: &CountryCode) -> PathBuf {
        self.root.join(schema_file_name(country))
    }

    /// Countries with a schema file under the root, sorted.
    pub fn available_countries(&self) -> Result<Vec<CountryCode>> {
        if !self.root.is_dir() {
            return Err(SchemaError::DirectoryNotFound {
                path: self.root.clone(),
            });
        }
        let entries = std::fs::read_dir(&self.root).map_err(|e| SchemaError::io(&self.root, e))?;
        let mut countries = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| SchemaError::io(&self.root, e))?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            if let Ok(country) = CountryCode::new(stem) {
                countries.push(country);
            }
        }
        countries.sort();
        Ok(countries)
    }
}

impl SchemaLoader for FsSchemaLoader {
    fn load(&self, country: &CountryCode) -> Result<SchemaDocument> {
        if !self.root.is_dir() {
            return Err(SchemaError::DirectoryNotFound {
                path: self.root.clone(),
            });
        }
        let path = self.path_for(country);
        if !path.is_file() {
            return Err(SchemaError::NotFound {
                country: country.clone(),
                path,
            });
        }
        load_schema_file(&path)
    }
}

/// Serves schema documents held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticSchemaLoader {
    schemas: HashMap<CountryCode, SchemaDocument>,
}

impl StaticSchemaLoader {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_schema(mut self, country: CountryCode, schema: SchemaDocument) -> Self {
        self.insert(country, schema);
        self
    }

    pub fn insert(&mut self, country: CountryCode, schema: SchemaDocument) {
        self.schemas.insert(country, schema);
    }
}

impl SchemaLoader for StaticSchemaLoader {
    fn load(&self, country: &CountryCode) -> Result<SchemaDocument> {
        self.schemas
            .get(country)
            .cloned()
            .ok_or_else(|| SchemaError::NotFound {
                country: country.clone(),
                path: PathBuf::from(schema_file_name(country)),
            })
    }
}

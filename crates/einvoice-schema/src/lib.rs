//! Schema loading and indexing for the e-invoice field engine.
//!
//! - [`loader`]: the per-country schema boundary ([`SchemaLoader`]) with a
//!   filesystem and an in-memory implementation
//! - [`graph`]: [`TypeGraph`], lookup tables over one schema document
//! - [`exclusion`]: [`ExclusionSet`], the transitive closure of the schema's
//!   permanently excluded component types
//!
//! # Schema Directory Structure
//!
//! ```text
//! schemas/
//! ├── MY.json
//! └── SA.json
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use einvoice_schema::{FsSchemaLoader, SchemaLoader, TypeGraph};
//!
//! let loader = FsSchemaLoader::from_env();
//! let schema = loader.load(&"MY".parse()?)?;
//! let graph = TypeGraph::build(schema);
//! let excluded = graph.exclusion_set();
//! ```

#![deny(unsafe_code)]

pub mod error;
pub mod exclusion;
pub mod graph;
pub mod loader;
pub mod paths;

pub use error::{Result, SchemaError};
pub use exclusion::ExclusionSet;
pub use graph::TypeGraph;
pub use loader::{FsSchemaLoader, SchemaLoader, StaticSchemaLoader, load_schema_file, parse_schema};
pub use paths::{SCHEMA_ENV_VAR, schema_root};

//! Data model for country-specific e-invoicing schemas.
//!
//! A schema document is a graph of [`Component`]s. Containers reference their
//! children through [`ElementRef`]s, and leaves are bound to a [`Validation`]
//! that decides which kind of input the leaf becomes. [`Rule`]s carry the
//! human label and the `required` flag for each field key.
//!
//! # Naming convention
//!
//! Component types follow `"<Name>Type"`. The field key of a leaf is its
//! component type with the trailing `Type` stripped, so `"TaxAmountType"`
//! becomes the payload key `"TaxAmount"`. See [`field_key`] and
//! [`component_type`].

#![deny(unsafe_code)]

pub mod component;
pub mod error;
pub mod field;
pub mod ids;
pub mod path;
pub mod validation;

pub use component::{Component, ElementRef, Rule, SchemaDocument, component_type, field_key};
pub use error::{ModelError, Result};
pub use field::{DropdownOption, FieldKind, FieldValue};
pub use ids::CountryCode;
pub use path::{FieldPath, PATH_DELIMITER};
pub use validation::{BaseType, Validation};

#![deny(unsafe_code)]

use std::fmt;

use crate::ModelError;

/// Country code selecting which schema document is loaded.
///
/// Stored upper-cased; schema files are named `<CODE>.json`.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct CountryCode(String);

impl CountryCode {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        let valid = (2..=3).contains(&trimmed.len())
            && trimmed.chars().all(|c| c.is_ascii_alphabetic());
        if !valid {
            return Err(ModelError::InvalidCountryCode(value));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CountryCode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ModelError {
    #[error("invalid country code: '{0}' (expected 2-3 ASCII letters)")]
    InvalidCountryCode(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;

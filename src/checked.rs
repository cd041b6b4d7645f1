//! Schema-checked deserialization.
//!
//! Validates a document against `T`'s derived schema first, so callers get
//! every violation with its path in one go, then deserializes with
//! `serde_path_to_error` for whatever the schema cannot express.
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::{DeriveConfig, ValidationConfig};
use crate::derive::{DeriveError, JsonSchema, derive_with};
use crate::validate::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum CheckedError {
    #[error(transparent)]
    Derive(#[from] DeriveError),

    #[error("document does not match its schema:\n{0}")]
    Invalid(#[from] ValidationErrors),

    #[error("at JSON path {path} → {message}")]
    Deserialize { path: String, message: String },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn from_value_checked<T: JsonSchema + DeserializeOwned>(value: Value) -> Result<T, CheckedError> {
    from_value_checked_with(value, &DeriveConfig::default(), ValidationConfig::default())
}

pub fn from_value_checked_with<T: JsonSchema + DeserializeOwned>(
    value: Value,
    derive_config: &DeriveConfig,
    validation_config: ValidationConfig,
) -> Result<T, CheckedError> {
    let schema = derive_with::<T>(derive_config)?;
    schema.validate_with(&value, validation_config).into_result()?;
    match serde_path_to_error::deserialize::<_, T>(value) {
        Ok(v) => Ok(v),
        Err(err) => {
            let path = err.path().to_string();
            Err(CheckedError::Deserialize { path, message: err.into_inner().to_string() })
        }
    }
}

pub fn from_str_checked<T: JsonSchema + DeserializeOwned>(src: &str) -> Result<T, CheckedError> {
    let value: Value = serde_json::from_str(src)?;
    from_value_checked(value)
}

pub fn from_slice_checked<T: JsonSchema + DeserializeOwned>(bytes: &[u8]) -> Result<T, CheckedError> {
    let value: Value = serde_json::from_slice(bytes)?;
    from_value_checked(value)
}

/// Errors raised while constructing or loading a [`Schema`](crate::Schema).
///
/// These never come out of validation; a value that fails a schema is
/// reported through [`ValidationResult`](crate::ValidationResult) instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    /// A `pattern` or `patternProperties` key is not a valid regex.
    #[error("invalid pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A JSON Schema document could not be mapped onto the schema model.
    #[error("invalid schema at {path}: {message}")]
    InvalidSchema { path: String, message: String },
}

impl SchemaError {
    pub(crate) fn invalid_schema(path: &str, message: impl Into<String>) -> Self {
        let path = if path.is_empty() { "/".to_string() } else { path.to_string() };
        SchemaError::InvalidSchema { path, message: message.into() }
    }
}

pub type Result<T> = std::result::Result<T, SchemaError>;

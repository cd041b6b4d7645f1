use super::Pattern;
use crate::error::SchemaError;

/// Constraints of a `{"type": "string"}` schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringSchema {
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<Pattern>,
    pub format: Option<String>,
    pub const_value: Option<String>,
    pub enum_values: Option<Vec<String>>,
}

impl StringSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_length(mut self, n: u64) -> Self {
        self.min_length = Some(n);
        self
    }

    pub fn max_length(mut self, n: u64) -> Self {
        self.max_length = Some(n);
        self
    }

    /// Compiles `source`; fails on an invalid regex.
    pub fn pattern(mut self, source: &str) -> Result<Self, SchemaError> {
        self.pattern = Some(Pattern::new(source)?);
        Ok(self)
    }

    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn format(mut self, name: impl Into<String>) -> Self {
        self.format = Some(name.into());
        self
    }

    pub fn constant(mut self, value: impl Into<String>) -> Self {
        self.const_value = Some(value.into());
        self
    }

    pub fn enum_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }
}

use std::fmt;

use regex::Regex;

use crate::error::SchemaError;

/// A regex compiled once when the schema is built.
///
/// Matching is unanchored, like JSON Schema's `pattern`: `"^a"` must be
/// written explicitly to pin the start.
#[derive(Clone)]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(source: &str) -> Result<Self, SchemaError> {
        Regex::new(source)
            .map(Pattern)
            .map_err(|err| SchemaError::InvalidPattern {
                pattern: source.to_string(),
                message: err.to_string(),
            })
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pattern({:?})", self.as_str())
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Pattern {
    type Error = SchemaError;

    fn try_from(source: &str) -> Result<Self, Self::Error> {
        Pattern::new(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unanchored_match() {
        let p = Pattern::new("[0-9]+").unwrap();
        assert!(p.is_match("abc123"));
        assert!(!p.is_match("abc"));
    }

    #[test]
    fn invalid_regex_is_a_construction_error() {
        let err = Pattern::new("(unclosed").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidPattern { ref pattern, .. } if pattern == "(unclosed"));
    }

    #[test]
    fn equality_is_by_source() {
        assert_eq!(Pattern::new("^a$").unwrap(), Pattern::new("^a$").unwrap());
        assert_ne!(Pattern::new("^a$").unwrap(), Pattern::new("^b$").unwrap());
    }
}

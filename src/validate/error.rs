/// One reason a value failed its schema. Every variant carries the JSON
/// pointer of the offending location.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{path}: expected {expected}, found {actual}")]
    TypeMismatch { path: String, expected: String, actual: String },

    /// `exclusive` tells whether the violated bound was exclusive.
    #[error("{path}: {actual} is out of range ({})", describe_range(.min, .max, .exclusive))]
    OutOfRange { path: String, min: Option<f64>, max: Option<f64>, exclusive: bool, actual: f64 },

    /// Also used for `minItems`.
    #[error("{path}: length {actual} is below the minimum of {min}")]
    MinLengthViolation { path: String, min: u64, actual: u64 },

    /// Also used for `maxItems`.
    #[error("{path}: length {actual} exceeds the maximum of {max}")]
    MaxLengthViolation { path: String, max: u64, actual: u64 },

    #[error("{path}: {value:?} does not match pattern `{pattern}`")]
    PatternMismatch { path: String, pattern: String, value: String },

    #[error("{path}: {value:?} is not a valid {format_name}")]
    InvalidFormat { path: String, format_name: String, value: String },

    #[error("{path}: {actual} is not a multiple of {multiple_of}")]
    MultipleOfViolation { path: String, multiple_of: f64, actual: f64 },

    #[error("{path}: missing required field `{name}`")]
    MissingField { path: String, name: String },

    #[error("{path}: unexpected property `{name}`")]
    AdditionalProperty { path: String, name: String },

    #[error("{path}: {message}")]
    CompositionError { path: String, message: String },
}

impl ValidationError {
    pub fn path(&self) -> &str {
        match self {
            ValidationError::TypeMismatch { path, .. }
            | ValidationError::OutOfRange { path, .. }
            | ValidationError::MinLengthViolation { path, .. }
            | ValidationError::MaxLengthViolation { path, .. }
            | ValidationError::PatternMismatch { path, .. }
            | ValidationError::InvalidFormat { path, .. }
            | ValidationError::MultipleOfViolation { path, .. }
            | ValidationError::MissingField { path, .. }
            | ValidationError::AdditionalProperty { path, .. }
            | ValidationError::CompositionError { path, .. } => path,
        }
    }

    pub(crate) fn composition(path: &str, message: impl Into<String>) -> Self {
        ValidationError::CompositionError { path: path.to_string(), message: message.into() }
    }
}

fn describe_range(min: &Option<f64>, max: &Option<f64>, exclusive: &bool) -> String {
    let (lo, hi) = if *exclusive { ("(", ")") } else { ("[", "]") };
    match (min, max) {
        (Some(a), Some(b)) => format!("{lo}{a}, {b}{hi}"),
        (Some(a), None) => format!("{lo}{a}, ∞)"),
        (None, Some(b)) => format!("(-∞, {b}{hi}"),
        (None, None) => "unbounded".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_path_and_detail() {
        let e = ValidationError::MissingField { path: "/".into(), name: "name".into() };
        assert_eq!(e.to_string(), "/: missing required field `name`");

        let e = ValidationError::OutOfRange {
            path: "/age".into(),
            min: Some(0.0),
            max: None,
            exclusive: true,
            actual: -1.0,
        };
        assert_eq!(e.to_string(), "/age: -1 is out of range ((0, ∞))");
        assert_eq!(e.path(), "/age");
    }
}

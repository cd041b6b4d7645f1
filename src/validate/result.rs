use std::fmt;

use super::error::ValidationError;

/// Outcome of validating one value.
///
/// A monoid under [`combine`](Self::combine): `Valid` is the identity and
/// two failures concatenate their errors in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ValidationResult {
    #[default]
    Valid,
    Invalid(Vec<ValidationError>),
}

impl ValidationResult {
    pub fn invalid(error: ValidationError) -> Self {
        ValidationResult::Invalid(vec![error])
    }

    /// `Valid` when `errors` is empty.
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        if errors.is_empty() { ValidationResult::Valid } else { ValidationResult::Invalid(errors) }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn errors(&self) -> &[ValidationError] {
        match self {
            ValidationResult::Valid => &[],
            ValidationResult::Invalid(errors) => errors,
        }
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        match self {
            ValidationResult::Valid => Vec::new(),
            ValidationResult::Invalid(errors) => errors,
        }
    }

    pub fn combine(self, other: ValidationResult) -> ValidationResult {
        match (self, other) {
            (ValidationResult::Valid, other) => other,
            (this, ValidationResult::Valid) => this,
            (ValidationResult::Invalid(mut a), ValidationResult::Invalid(b)) => {
                a.extend(b);
                ValidationResult::Invalid(a)
            }
        }
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        match self {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid(errors) => Err(ValidationErrors { errors }),
        }
    }
}

impl From<ValidationError> for ValidationResult {
    fn from(error: ValidationError) -> Self {
        ValidationResult::invalid(error)
    }
}

impl FromIterator<ValidationResult> for ValidationResult {
    fn from_iter<I: IntoIterator<Item = ValidationResult>>(iter: I) -> Self {
        iter.into_iter().fold(ValidationResult::Valid, ValidationResult::combine)
    }
}

/// Non-empty list of validation errors, usable as a `std::error::Error`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn into_inner(self) -> Vec<ValidationError> {
        self.errors
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing(name: &str) -> ValidationResult {
        ValidationResult::invalid(ValidationError::MissingField { path: "/".into(), name: name.into() })
    }

    #[test]
    fn valid_is_identity() {
        let a = missing("a");
        assert_eq!(ValidationResult::Valid.combine(a.clone()), a);
        assert_eq!(a.clone().combine(ValidationResult::Valid), a);
    }

    #[test]
    fn combine_concatenates_in_order() {
        let out = missing("a").combine(missing("b"));
        let names: Vec<_> = out
            .errors()
            .iter()
            .map(|e| match e {
                ValidationError::MissingField { name, .. } => name.as_str(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn collects_from_iterator() {
        let out: ValidationResult = vec![ValidationResult::Valid, missing("x"), missing("y")].into_iter().collect();
        assert_eq!(out.errors().len(), 2);
        let none: ValidationResult = std::iter::empty().collect();
        assert!(none.is_valid());
    }

    #[test]
    fn into_result_lists_one_error_per_line() {
        let err = missing("a").combine(missing("b")).into_result().unwrap_err();
        assert_eq!(err.len(), 2);
        assert_eq!(err.to_string().lines().count(), 2);
        assert!(ValidationResult::Valid.into_result().is_ok());
    }
}

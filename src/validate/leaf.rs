use serde_json::Value;

use super::equality::{is_integral, json_eq, kind_of};
use super::format;
use super::{ValidationContext, ValidationError, ValidationResult};
use crate::schema::emit::json_num_pref_i64;
use crate::schema::{NumericSchema, StringSchema};

// ------------------------------- Kind check ------------------------------- //

pub(super) fn mismatch(expected: &str, value: &Value, ctx: &ValidationContext<'_>) -> ValidationResult {
    ValidationResult::invalid(ValidationError::TypeMismatch {
        path: ctx.path().to_string(),
        expected: expected.to_string(),
        actual: kind_of(value).to_string(),
    })
}

pub(super) fn null(value: &Value, ctx: &ValidationContext<'_>) -> ValidationResult {
    if value.is_null() { ValidationResult::Valid } else { mismatch("null", value, ctx) }
}

pub(super) fn boolean(const_value: Option<bool>, value: &Value, ctx: &ValidationContext<'_>) -> ValidationResult {
    let Value::Bool(b) = value else {
        return mismatch("boolean", value, ctx);
    };
    match const_value {
        Some(c) if c != *b => ValidationResult::invalid(ValidationError::TypeMismatch {
            path: ctx.path().to_string(),
            expected: c.to_string(),
            actual: b.to_string(),
        }),
        _ => ValidationResult::Valid,
    }
}

// --------------------------------- String --------------------------------- //

pub(super) fn string(s: &StringSchema, value: &Value, ctx: &ValidationContext<'_>) -> ValidationResult {
    let Value::String(text) = value else {
        return mismatch("string", value, ctx);
    };
    let path = ctx.path();
    let mut errors = Vec::new();

    let len = text.chars().count() as u64;
    if let Some(min) = s.min_length {
        if len < min {
            errors.push(ValidationError::MinLengthViolation { path: path.to_string(), min, actual: len });
        }
    }
    if let Some(max) = s.max_length {
        if len > max {
            errors.push(ValidationError::MaxLengthViolation { path: path.to_string(), max, actual: len });
        }
    }
    if let Some(pattern) = &s.pattern {
        if !pattern.is_match(text) {
            errors.push(ValidationError::PatternMismatch {
                path: path.to_string(),
                pattern: pattern.as_str().to_string(),
                value: text.clone(),
            });
        }
    }
    if let Some(name) = &s.format {
        if ctx.config().assert_formats && format::check(name, text) == Some(false) {
            errors.push(ValidationError::InvalidFormat {
                path: path.to_string(),
                format_name: name.clone(),
                value: text.clone(),
            });
        }
    }
    if let Some(c) = &s.const_value {
        if c != text {
            errors.push(ValidationError::TypeMismatch {
                path: path.to_string(),
                expected: Value::from(c.as_str()).to_string(),
                actual: value.to_string(),
            });
        }
    }
    if let Some(allowed) = &s.enum_values {
        if !allowed.iter().any(|a| a == text) {
            errors.push(ValidationError::TypeMismatch {
                path: path.to_string(),
                expected: format!("one of {}", Value::from(allowed.clone())),
                actual: value.to_string(),
            });
        }
    }
    ValidationResult::from_errors(errors)
}

// --------------------------------- Numeric -------------------------------- //

// tolerance for float remainders in `multipleOf`
const MULTIPLE_OF_EPSILON: f64 = 1e-9;

pub(super) fn numeric(
    n: &NumericSchema,
    integer: bool,
    value: &Value,
    ctx: &ValidationContext<'_>,
) -> ValidationResult {
    let expected = if integer { "integer" } else { "number" };
    let Value::Number(num) = value else {
        return mismatch(expected, value, ctx);
    };
    if integer && !is_integral(num) {
        return mismatch(expected, value, ctx);
    }
    let Some(x) = num.as_f64() else {
        return mismatch(expected, value, ctx);
    };
    let path = ctx.path();
    let out_of_range = |min: Option<f64>, max: Option<f64>, exclusive: bool| ValidationError::OutOfRange {
        path: path.to_string(),
        min,
        max,
        exclusive,
        actual: x,
    };

    let mut errors = Vec::new();
    if let Some(min) = n.minimum {
        if x < min {
            errors.push(out_of_range(Some(min), None, false));
        }
    }
    if let Some(max) = n.maximum {
        if x > max {
            errors.push(out_of_range(None, Some(max), false));
        }
    }
    if let Some(min) = n.exclusive_minimum {
        if x <= min {
            errors.push(out_of_range(Some(min), None, true));
        }
    }
    if let Some(max) = n.exclusive_maximum {
        if x >= max {
            errors.push(out_of_range(None, Some(max), true));
        }
    }
    if let Some(m) = n.multiple_of {
        if m > 0.0 {
            let q = x / m;
            if (q - q.round()).abs() > MULTIPLE_OF_EPSILON {
                errors.push(ValidationError::MultipleOfViolation {
                    path: path.to_string(),
                    multiple_of: m,
                    actual: x,
                });
            }
        }
    }
    if let Some(c) = n.const_value {
        if x != c {
            errors.push(ValidationError::TypeMismatch {
                path: path.to_string(),
                expected: json_num_pref_i64(c).to_string(),
                actual: value.to_string(),
            });
        }
    }
    ValidationResult::from_errors(errors)
}

// ---------------------------------- Enum ---------------------------------- //

pub(super) fn enumeration(values: &[Value], value: &Value, ctx: &ValidationContext<'_>) -> ValidationResult {
    if values.iter().any(|v| json_eq(v, value)) {
        return ValidationResult::Valid;
    }
    let expected = match values {
        [only] => only.to_string(),
        _ => format!("one of {}", Value::from(values.to_vec())),
    };
    ValidationResult::invalid(ValidationError::TypeMismatch {
        path: ctx.path().to_string(),
        expected,
        actual: value.to_string(),
    })
}

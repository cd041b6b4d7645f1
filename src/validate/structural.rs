use serde_json::Value;

use super::equality::json_eq;
use super::leaf::mismatch;
use super::{ValidationContext, ValidationError, ValidationResult, validate};
use crate::schema::{AdditionalProperties, ArraySchema, ObjectSchema};

pub(super) fn object(o: &ObjectSchema, value: &Value, ctx: &ValidationContext<'_>) -> ValidationResult {
    let Value::Object(map) = value else {
        return mismatch("object", value, ctx);
    };
    let mut results = Vec::new();

    for name in &o.required {
        if !map.contains_key(name) {
            results.push(ValidationResult::invalid(ValidationError::MissingField {
                path: ctx.path().to_string(),
                name: name.clone(),
            }));
        }
    }

    for (name, schema) in &o.properties {
        if let Some(v) = map.get(name) {
            results.push(validate(schema, v, &ctx.with_property(name)));
        }
    }

    for (key, v) in map {
        if o.properties.contains_key(key) {
            continue;
        }
        let child = ctx.with_property(key);
        let mut matched = false;
        for (pattern, schema) in &o.pattern_properties {
            if pattern.is_match(key) {
                matched = true;
                results.push(validate(schema, v, &child));
            }
        }
        if matched {
            continue;
        }
        match &o.additional_properties {
            AdditionalProperties::Allow => {}
            AdditionalProperties::Deny => {
                results.push(ValidationResult::invalid(ValidationError::AdditionalProperty {
                    path: ctx.path().to_string(),
                    name: key.clone(),
                }));
            }
            AdditionalProperties::Schema(schema) => results.push(validate(schema, v, &child)),
        }
    }

    results.into_iter().collect()
}

pub(super) fn array(a: &ArraySchema, value: &Value, ctx: &ValidationContext<'_>) -> ValidationResult {
    let Value::Array(xs) = value else {
        return mismatch("array", value, ctx);
    };
    let path = ctx.path();
    let len = xs.len() as u64;
    let mut results: Vec<ValidationResult> = Vec::new();

    if let Some(min) = a.min_items {
        if len < min {
            results.push(ValidationError::MinLengthViolation { path: path.to_string(), min, actual: len }.into());
        }
    }
    if let Some(max) = a.max_items {
        if len > max {
            results.push(ValidationError::MaxLengthViolation { path: path.to_string(), max, actual: len }.into());
        }
    }

    if a.unique_items {
        if let Some((i, j)) = first_duplicate(xs) {
            results.push(
                ValidationError::composition(path, format!("items {i} and {j} are equal; items must be unique"))
                    .into(),
            );
        }
    }

    let prefix = a.prefix_items.as_deref().unwrap_or(&[]);
    for (i, item) in xs.iter().enumerate() {
        let schema = prefix.get(i).unwrap_or(a.items.as_ref());
        results.push(validate(schema, item, &ctx.with_index(i)));
    }

    if let Some(contains) = &a.contains {
        let count = xs
            .iter()
            .enumerate()
            .filter(|(i, item)| validate(contains, item, &ctx.with_index(*i)).is_valid())
            .count() as u64;
        let min = a.min_contains.unwrap_or(1);
        let too_few = count < min;
        let too_many = a.max_contains.is_some_and(|max| count > max);
        if too_few || too_many {
            let bound = match a.max_contains {
                Some(max) => format!("between {min} and {max}"),
                None => format!("at least {min}"),
            };
            results.push(
                ValidationError::composition(
                    path,
                    format!("{count} items match `contains`, expected {bound}"),
                )
                .into(),
            );
        }
    }

    results.into_iter().collect()
}

fn first_duplicate(xs: &[Value]) -> Option<(usize, usize)> {
    for (j, b) in xs.iter().enumerate() {
        for (i, a) in xs[..j].iter().enumerate() {
            if json_eq(a, b) {
                return Some((i, j));
            }
        }
    }
    None
}

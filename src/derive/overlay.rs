//! Phase 2: merge declared metadata into a structural schema.
//!
//! Annotations wrap through the idempotent modifier builders; value
//! constraints overwrite fields on the base variant reached through any
//! modifiers. Applying the same metadata twice yields the same schema, and
//! `required` is never touched.
use std::fmt;

use tracing::{debug, warn};

use super::metadata::{Constraint, FieldMetadata, TypeMetadata};
use crate::schema::{AdditionalProperties, Pattern, Schema};
use crate::validate::context::escape_pointer_segment;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DeriveError {
    #[error("incompatible constraints:\n{}", list(.0))]
    IncompatibleConstraints(Vec<ConstraintMismatch>),
}

/// Every constraint that could not be applied at one location.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintMismatch {
    /// JSON pointer of the field in the derived schema (`/` for the type
    /// itself).
    pub field: String,
    /// What was found there: the base kind, or `no such property`.
    pub found: String,
    pub constraints: Vec<String>,
}

impl fmt::Display for ConstraintMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {}: {} not applicable to {}", self.field, self.constraints.join(", "), self.found)
    }
}

fn list(mismatches: &[ConstraintMismatch]) -> String {
    mismatches.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")
}

pub fn overlay(schema: Schema, meta: &TypeMetadata) -> Result<Schema, DeriveError> {
    let mut mismatches = Vec::new();
    let out = apply_type(schema, meta, "", &mut mismatches);
    if mismatches.is_empty() {
        debug!(kind = out.kind_name(), "metadata overlay applied");
        Ok(out)
    } else {
        warn!(count = mismatches.len(), "metadata overlay rejected");
        Err(DeriveError::IncompatibleConstraints(mismatches))
    }
}

// -------------------------------- Walkers --------------------------------- //

fn apply_type(schema: Schema, meta: &TypeMetadata, at: &str, out: &mut Vec<ConstraintMismatch>) -> Schema {
    let mut schema = apply_constraints(schema, &meta.constraints, at, out);

    if !meta.fields.is_empty() {
        apply_fields(&mut schema, meta, at, out);
    }

    if let Some(items) = &meta.items {
        let path = child(at, "items");
        match schema.base_mut() {
            Schema::Array(a) => {
                let taken = std::mem::replace(a.items.as_mut(), Schema::Null);
                *a.items = apply_type(taken, items, &path, out);
            }
            other => report(out, mismatch(&path, other.kind_name(), vec!["items".to_string()])),
        }
    }

    if let Some(values) = &meta.values {
        let path = child(at, "additionalProperties");
        match schema.base_mut() {
            Schema::Object(o) => match &mut o.additional_properties {
                AdditionalProperties::Schema(s) => {
                    let taken = std::mem::replace(s.as_mut(), Schema::Null);
                    **s = apply_type(taken, values, &path, out);
                }
                _ => report(out, mismatch(&path, "object without a value schema", vec!["values".to_string()])),
            },
            other => report(out, mismatch(&path, other.kind_name(), vec!["values".to_string()])),
        }
    }

    schema
}

fn apply_fields(schema: &mut Schema, meta: &TypeMetadata, at: &str, out: &mut Vec<ConstraintMismatch>) {
    let found = schema.kind_name();
    let Schema::Object(o) = schema.base_mut() else {
        let names = meta.fields.keys().map(|n| format!("field `{n}`")).collect();
        report(out, mismatch(at, found, names));
        return;
    };
    for (name, field) in &meta.fields {
        let path = child(at, name);
        match o.properties.get_mut(name) {
            Some(slot) => {
                let taken = std::mem::replace(slot, Schema::Null);
                *slot = apply_field(taken, field, &path, out);
            }
            None => report(out, mismatch(&path, "no such property", keywords(&field.constraints))),
        }
    }
}

fn apply_field(schema: Schema, field: &FieldMetadata, at: &str, out: &mut Vec<ConstraintMismatch>) -> Schema {
    let schema = apply_constraints(schema, &field.constraints, at, out);
    match &field.nested {
        Some(nested) => apply_type(schema, nested, at, out),
        None => schema,
    }
}

fn apply_constraints(schema: Schema, cs: &[Constraint], at: &str, out: &mut Vec<ConstraintMismatch>) -> Schema {
    let mut s = schema;
    let mut rejected = Vec::new();
    for c in cs {
        if c.is_annotation() {
            s = annotate(s, c);
        } else if let Err(reason) = apply_value(s.base_mut(), c) {
            rejected.push(reason);
        }
    }
    if !rejected.is_empty() {
        report(out, mismatch(at, s.kind_name(), rejected));
    }
    s
}

fn annotate(s: Schema, c: &Constraint) -> Schema {
    match c {
        Constraint::Title(text) => s.with_title(text.clone()),
        Constraint::Description(text) => s.with_description(text.clone()),
        Constraint::Default(value) => s.with_default(value.clone()),
        Constraint::Examples(xs) => s.with_examples(xs.clone()),
        Constraint::Deprecated => s.deprecated(),
        Constraint::ReadOnly => s.read_only(),
        Constraint::WriteOnly => s.write_only(),
        _ => s,
    }
}

/// Sets one value constraint on `base`; `Err` carries the description of a
/// rejected constraint.
fn apply_value(base: &mut Schema, c: &Constraint) -> Result<(), String> {
    match (base, c) {
        (Schema::Integer(n) | Schema::Number(n), Constraint::Minimum(x)) => n.minimum = Some(*x),
        (Schema::Integer(n) | Schema::Number(n), Constraint::Maximum(x)) => n.maximum = Some(*x),
        (Schema::Integer(n) | Schema::Number(n), Constraint::ExclusiveMinimum(x)) => n.exclusive_minimum = Some(*x),
        (Schema::Integer(n) | Schema::Number(n), Constraint::ExclusiveMaximum(x)) => n.exclusive_maximum = Some(*x),
        (Schema::Integer(n) | Schema::Number(n), Constraint::MultipleOf(x)) => {
            if *x <= 0.0 {
                return Err(format!("multipleOf ({x} is not positive)"));
            }
            n.multiple_of = Some(*x);
        }

        (Schema::String(s), Constraint::MinLength(x)) => s.min_length = Some(*x),
        (Schema::String(s), Constraint::MaxLength(x)) => s.max_length = Some(*x),
        (Schema::String(s), Constraint::Pattern(src)) => match Pattern::new(src) {
            Ok(p) => s.pattern = Some(p),
            Err(e) => return Err(format!("pattern ({e})")),
        },
        (Schema::String(s), Constraint::Format(name)) => s.format = Some(name.clone()),
        (Schema::String(s), Constraint::Enum(values)) => {
            let texts: Option<Vec<String>> = values.iter().map(|v| v.as_str().map(str::to_string)).collect();
            match texts {
                Some(texts) => s.enum_values = Some(texts),
                None => return Err("enum (non-string values on a string)".to_string()),
            }
        }
        (Schema::Enum { values }, Constraint::Enum(narrowed)) => *values = narrowed.clone(),

        (Schema::Array(a), Constraint::MinItems(x)) => a.min_items = Some(*x),
        (Schema::Array(a), Constraint::MaxItems(x)) => a.max_items = Some(*x),
        (Schema::Array(a), Constraint::UniqueItems) => a.unique_items = true,

        (_, other) => return Err(other.keyword().to_string()),
    }
    Ok(())
}

// -------------------------------- Helpers --------------------------------- //

fn child(at: &str, segment: &str) -> String {
    format!("{at}/{}", escape_pointer_segment(segment))
}

fn mismatch(at: &str, found: &str, constraints: Vec<String>) -> ConstraintMismatch {
    let field = if at.is_empty() { "/".to_string() } else { at.to_string() };
    ConstraintMismatch { field, found: found.to_string(), constraints }
}

/// One entry per location: a second rejection at the same path (a field's
/// own constraints, then its type's) extends the first.
fn report(out: &mut Vec<ConstraintMismatch>, m: ConstraintMismatch) {
    match out.iter_mut().find(|seen| seen.field == m.field) {
        Some(seen) => seen.constraints.extend(m.constraints),
        None => out.push(m),
    }
}

fn keywords(cs: &[Constraint]) -> Vec<String> {
    cs.iter().map(|c| c.keyword().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ObjectSchema, StringSchema};
    use serde_json::json;

    fn person() -> Schema {
        ObjectSchema::new()
            .field("name", Schema::string())
            .field("age", Schema::integer().nullable().optional())
            .field("tags", Schema::array_of(Schema::string()))
            .into()
    }

    fn person_meta() -> TypeMetadata {
        TypeMetadata::new()
            .title("Person")
            .field("name", FieldMetadata::of([Constraint::MinLength(1), Constraint::Description("full name".into())]))
            .field("age", FieldMetadata::of([Constraint::Minimum(0.0), Constraint::Maximum(150.0)]))
            .field(
                "tags",
                FieldMetadata::of([Constraint::UniqueItems])
                    .nested(TypeMetadata::new().items(TypeMetadata::new().constraint(Constraint::MaxLength(8)))),
            )
    }

    #[test]
    fn constraints_reach_base_through_modifiers() {
        let s = overlay(person(), &person_meta()).unwrap();
        assert_eq!(s.title(), Some("Person"));
        let Schema::Object(o) = s.base() else { panic!() };
        assert_eq!(o.properties["name"].description(), Some("full name"));
        assert!(matches!(o.properties["name"].base(), Schema::String(StringSchema { min_length: Some(1), .. })));
        assert!(o.properties["age"].is_optional() && o.properties["age"].is_nullable());
        let Schema::Integer(age) = o.properties["age"].base() else { panic!() };
        assert_eq!((age.minimum, age.maximum), (Some(0.0), Some(150.0)));
        let Schema::Array(tags) = o.properties["tags"].base() else { panic!() };
        assert!(tags.unique_items);
        assert!(matches!(tags.items.base(), Schema::String(StringSchema { max_length: Some(8), .. })));
    }

    #[test]
    fn overlay_is_idempotent_and_keeps_required() {
        let once = overlay(person(), &person_meta()).unwrap();
        let twice = overlay(once.clone(), &person_meta()).unwrap();
        assert_eq!(once, twice);
        let (Schema::Object(before), Schema::Object(after)) = (person(), once.base().clone()) else { panic!() };
        assert_eq!(before.required, after.required);
    }

    #[test]
    fn default_does_not_change_required() {
        let meta = TypeMetadata::new().field("name", Constraint::Default(json!("anon")).into());
        let s = overlay(person(), &meta).unwrap();
        let Schema::Object(o) = s.base() else { panic!() };
        assert!(o.required.contains("name"));
        assert_eq!(o.properties["name"].default_value(), Some(&json!("anon")));
    }

    #[test]
    fn collects_one_mismatch_per_offending_field() {
        let meta = TypeMetadata::new()
            .field("name", FieldMetadata::of([Constraint::Minimum(1.0), Constraint::MultipleOf(2.0)]))
            .field("age", FieldMetadata::of([Constraint::Pattern("^[0-9]+$".into())]))
            .field("nickname", Constraint::MaxLength(3).into())
            .field("tags", FieldMetadata::of([Constraint::Pattern("(".into())]));
        let Err(DeriveError::IncompatibleConstraints(ms)) = overlay(person(), &meta) else {
            panic!("expected mismatches")
        };
        assert_eq!(ms.len(), 4);
        assert_eq!(
            ms[0],
            ConstraintMismatch {
                field: "/name".into(),
                found: "string".into(),
                constraints: vec!["minimum".into(), "multipleOf".into()],
            }
        );
        assert_eq!(ms[1].field, "/age");
        assert_eq!(ms[1].found, "integer");
        assert_eq!(ms[2], ConstraintMismatch {
            field: "/nickname".into(),
            found: "no such property".into(),
            constraints: vec!["maxLength".into()],
        });
        assert_eq!(ms[3].field, "/tags");
    }

    #[test]
    fn field_and_type_rejections_share_one_entry() {
        let s: Schema = ObjectSchema::new().field("x", Schema::string()).into();
        let meta = TypeMetadata::new().field(
            "x",
            FieldMetadata::of([Constraint::Minimum(1.0)])
                .nested(TypeMetadata::new().constraint(Constraint::MinItems(1))),
        );
        let Err(DeriveError::IncompatibleConstraints(ms)) = overlay(s, &meta) else { panic!("expected mismatches") };
        assert_eq!(
            ms,
            vec![ConstraintMismatch {
                field: "/x".into(),
                found: "string".into(),
                constraints: vec!["minimum".into(), "minItems".into()],
            }]
        );
    }

    #[test]
    fn invalid_pattern_on_string_is_reported() {
        let meta = TypeMetadata::new().field("name", Constraint::Pattern("(".into()).into());
        let Err(DeriveError::IncompatibleConstraints(ms)) = overlay(person(), &meta) else { panic!() };
        assert_eq!(ms.len(), 1);
        assert!(ms[0].constraints[0].starts_with("pattern ("));
    }

    #[test]
    fn map_values_take_value_metadata() {
        let s: Schema = ObjectSchema::new().additional(Schema::integer()).into();
        let meta = TypeMetadata::new().values(TypeMetadata::new().constraint(Constraint::Minimum(1.0)));
        let s = overlay(s, &meta).unwrap();
        assert!(!s.validate(&json!({ "a": 0 })).is_valid());
        assert!(s.validate(&json!({ "a": 1 })).is_valid());
    }
}

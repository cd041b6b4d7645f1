//! Recursive, path-aware validation of JSON values against a [`Schema`].
//!
//! Validation never fails in the Rust sense: every outcome, including an
//! unresolvable `$ref`, is reported as data in a [`ValidationResult`].
//! Errors come out in discovery order (left to right, depth first).
pub(crate) mod context;
mod equality;
mod error;
mod format;
mod leaf;
mod result;
mod structural;

use serde_json::Value;
use tracing::trace;

use crate::config::ValidationConfig;
use crate::schema::Schema;

pub use context::ValidationContext;
pub use error::ValidationError;
pub use result::{ValidationErrors, ValidationResult};

impl Schema {
    /// Validates `value` with this schema as the `$ref` root.
    pub fn validate(&self, value: &Value) -> ValidationResult {
        validate(self, value, &ValidationContext::for_root(self))
    }

    pub fn validate_with(&self, value: &Value, config: ValidationConfig) -> ValidationResult {
        validate(self, value, &ValidationContext::for_root(self).with_config(config))
    }

    pub fn validate_in(&self, value: &Value, ctx: &ValidationContext<'_>) -> ValidationResult {
        validate(self, value, ctx)
    }
}

pub fn validate(schema: &Schema, value: &Value, ctx: &ValidationContext<'_>) -> ValidationResult {
    match schema {
        Schema::Null => leaf::null(value, ctx),
        Schema::Boolean { const_value } => leaf::boolean(*const_value, value, ctx),
        Schema::String(s) => leaf::string(s, value, ctx),
        Schema::Integer(n) => leaf::numeric(n, true, value, ctx),
        Schema::Number(n) => leaf::numeric(n, false, value, ctx),
        Schema::Enum { values } => leaf::enumeration(values, value, ctx),

        Schema::Object(o) => structural::object(o, value, ctx),
        Schema::Array(a) => structural::array(a, value, ctx),

        Schema::AllOf(xs) => xs.iter().map(|s| validate(s, value, ctx)).collect(),
        Schema::AnyOf(xs) => any_of(xs, value, ctx),
        Schema::OneOf(xs) => one_of(xs, value, ctx),
        Schema::Not(inner) => not(inner, value, ctx),
        Schema::IfThenElse { condition, then_schema, else_schema } => {
            let holds = validate(condition, value, ctx).is_valid();
            trace!(path = ctx.path(), holds, "if");
            let branch = if holds { then_schema } else { else_schema };
            match branch {
                Some(s) => validate(s, value, ctx),
                None => ValidationResult::Valid,
            }
        }
        Schema::Ref(target) => reference(target, value, ctx),

        Schema::Nullable(_) if value.is_null() => ValidationResult::Valid,
        // absence is the parent object's business; present values validate
        // like any other
        Schema::Optional(inner)
        | Schema::Nullable(inner)
        | Schema::WithDefault { inner, .. }
        | Schema::WithTitle { inner, .. }
        | Schema::WithDescription { inner, .. }
        | Schema::WithDefs { inner, .. }
        | Schema::WithId { inner, .. }
        | Schema::WithAnnotations { inner, .. } => validate(inner, value, ctx),
    }
}

// ------------------------------ Combinators ------------------------------- //

fn any_of(xs: &[Schema], value: &Value, ctx: &ValidationContext<'_>) -> ValidationResult {
    if xs.is_empty() {
        return ValidationError::composition(ctx.path(), "anyOf has no alternatives; nothing matches").into();
    }
    let mut failures = Vec::with_capacity(xs.len());
    for (i, s) in xs.iter().enumerate() {
        let r = validate(s, value, ctx);
        if r.is_valid() {
            trace!(path = ctx.path(), branch = i, "anyOf matched");
            return ValidationResult::Valid;
        }
        failures.push(r);
    }
    trace!(path = ctx.path(), "anyOf: no branch matched");
    failures.into_iter().collect()
}

fn one_of(xs: &[Schema], value: &Value, ctx: &ValidationContext<'_>) -> ValidationResult {
    // every branch runs so the ambiguity report lists all matches
    let matched: Vec<usize> = xs
        .iter()
        .enumerate()
        .filter(|(_, s)| validate(s, value, ctx).is_valid())
        .map(|(i, _)| i)
        .collect();
    trace!(path = ctx.path(), ?matched, branches = xs.len(), "oneOf");
    match matched.as_slice() {
        [_] => ValidationResult::Valid,
        [] => ValidationError::composition(
            ctx.path(),
            format!("does not match any of the {} oneOf alternatives", xs.len()),
        )
        .into(),
        many => {
            let list = many.iter().map(usize::to_string).collect::<Vec<_>>().join(", ");
            ValidationError::composition(
                ctx.path(),
                format!("matches more than one oneOf alternative (branches {list})"),
            )
            .into()
        }
    }
}

fn not(inner: &Schema, value: &Value, ctx: &ValidationContext<'_>) -> ValidationResult {
    if validate(inner, value, ctx).is_valid() {
        trace!(path = ctx.path(), "not: inner schema matched");
        ValidationError::composition(ctx.path(), "must NOT match the negated schema").into()
    } else {
        ValidationResult::Valid
    }
}

// ------------------------------- References ------------------------------- //

fn reference(target: &str, value: &Value, ctx: &ValidationContext<'_>) -> ValidationResult {
    let Some(root) = ctx.root() else {
        return ValidationError::composition(ctx.path(), format!("cannot resolve `{target}`: no root schema")).into();
    };
    let Some(resolved) = resolve(target, root) else {
        return ValidationError::composition(ctx.path(), format!("cannot resolve `{target}`")).into();
    };
    let Some(next) = ctx.follow_ref(target) else {
        return ValidationError::composition(ctx.path(), format!("`{target}` is part of a reference cycle")).into();
    };
    trace!(path = ctx.path(), target, "following $ref");
    validate(resolved, value, &next)
}

/// Local references only: `#`, `#/$defs/<name>`, `#/definitions/<name>`.
fn resolve<'a>(target: &str, root: &'a Schema) -> Option<&'a Schema> {
    if target == "#" {
        return Some(root);
    }
    let name = target.strip_prefix("#/$defs/").or_else(|| target.strip_prefix("#/definitions/"))?;
    let name = name.replace("~1", "/").replace("~0", "~");
    root.defs()?.get(&name)
}

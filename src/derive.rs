//! Schemas from Rust types.
//!
//! Derivation runs in two phases that never mix:
//!
//! 1. [`JsonSchema::structural_schema`] describes the *shape* of a type:
//!    which fields exist, which are required, how variants are tagged.
//!    Records and sum types are assembled with [`Record`] and [`Variants`].
//! 2. [`JsonSchema::metadata`] declares constraints and annotations
//!    (bounds, patterns, titles, ...) that [`overlay`] merges into the
//!    structural schema.
//!
//! Recursive types are not supported: a `structural_schema` that calls
//! itself never terminates. Build such schemas by hand with
//! [`Schema::reference`] and `$defs`.
mod impls;
mod metadata;
mod overlay;
mod shape;

use tracing::{debug, warn};

use crate::config::DeriveConfig;
use crate::schema::{AdditionalProperties, Schema};

pub use impls::Nullable;
pub use metadata::{Constraint, FieldMetadata, TypeMetadata};
pub use overlay::{ConstraintMismatch, DeriveError, overlay};
pub use shape::{Record, Tagging, Variants};

/// A type with a JSON Schema.
pub trait JsonSchema {
    fn structural_schema() -> Schema;

    fn metadata() -> TypeMetadata {
        TypeMetadata::default()
    }
}

pub fn derive<T: JsonSchema + ?Sized>() -> Result<Schema, DeriveError> {
    derive_with::<T>(&DeriveConfig::default())
}

pub fn derive_with<T: JsonSchema + ?Sized>(config: &DeriveConfig) -> Result<Schema, DeriveError> {
    let mut schema = overlay(T::structural_schema(), &T::metadata())?;
    if config.strict_mode {
        apply_strict_mode(&mut schema);
    }
    debug!(
        type_name = std::any::type_name::<T>(),
        kind = schema.kind_name(),
        strict = config.strict_mode,
        "derived schema"
    );
    Ok(schema)
}

/// `F`'s structural schema with `F`'s own metadata applied: what a record
/// field, a variant payload or a tuple slot of type `F` embeds.
///
/// A type whose metadata does not fit its structure fails its own
/// [`derive`]; embedded, it keeps its bare structure.
pub(crate) fn embedded<F: JsonSchema + ?Sized>() -> Schema {
    let structural = F::structural_schema();
    let meta = F::metadata();
    if meta.is_empty() {
        return structural;
    }
    match overlay(structural.clone(), &meta) {
        Ok(schema) => schema,
        Err(err) => {
            warn!(type_name = std::any::type_name::<F>(), %err, "embedding structure without metadata");
            structural
        }
    }
}

/// Closes every object that declares properties and still allows unknown
/// keys. Objects without properties (maps, `{}`) are left open.
pub fn apply_strict_mode(schema: &mut Schema) {
    match schema {
        Schema::Object(o) => {
            if !o.properties.is_empty() && o.additional_properties == AdditionalProperties::Allow {
                o.additional_properties = AdditionalProperties::Deny;
            }
            o.properties.values_mut().for_each(apply_strict_mode);
            for (_, s) in &mut o.pattern_properties {
                apply_strict_mode(s);
            }
            if let AdditionalProperties::Schema(s) = &mut o.additional_properties {
                apply_strict_mode(s);
            }
        }
        Schema::Array(a) => {
            apply_strict_mode(&mut a.items);
            for s in a.prefix_items.iter_mut().flatten() {
                apply_strict_mode(s);
            }
            if let Some(s) = &mut a.contains {
                apply_strict_mode(s);
            }
        }
        Schema::AllOf(xs) | Schema::AnyOf(xs) | Schema::OneOf(xs) => xs.iter_mut().for_each(apply_strict_mode),
        Schema::Not(inner) => apply_strict_mode(inner),
        Schema::IfThenElse { condition, then_schema, else_schema } => {
            apply_strict_mode(condition);
            for s in [then_schema, else_schema].into_iter().flatten() {
                apply_strict_mode(s);
            }
        }
        Schema::WithDefs { inner, defs } => {
            apply_strict_mode(inner);
            defs.values_mut().for_each(apply_strict_mode);
        }
        other => {
            if let Some(inner) = other.inner_mut() {
                apply_strict_mode(inner);
            }
        }
    }
}

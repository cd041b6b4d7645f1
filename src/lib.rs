//! JSON document contracts: a closed JSON Schema 2020-12 model, a
//! path-aware validator, and schema derivation from Rust types.
//!
//! ```
//! use json_contract::{Record, JsonSchema, Schema, derive};
//! use serde_json::json;
//!
//! struct User;
//!
//! impl JsonSchema for User {
//!     fn structural_schema() -> Schema {
//!         Record::new().field::<String>("name").field::<Option<u8>>("age").build()
//!     }
//! }
//!
//! let schema = derive::<User>().unwrap();
//! assert!(schema.validate(&json!({ "name": "Ada" })).is_valid());
//! assert_eq!(schema.to_json_schema()["required"], json!(["name"]));
//! ```
pub mod checked;
pub mod config;
pub mod derive;
pub mod error;
pub mod schema;
pub mod validate;

pub use checked::{CheckedError, from_slice_checked, from_str_checked, from_value_checked, from_value_checked_with};
pub use config::{DeriveConfig, ValidationConfig};
pub use derive::{
    Constraint, ConstraintMismatch, DeriveError, FieldMetadata, JsonSchema, Nullable, Record, Tagging, TypeMetadata,
    Variants, apply_strict_mode, derive, derive_with, overlay,
};
pub use error::SchemaError;
pub use schema::{
    AdditionalProperties, Annotations, ArraySchema, NumericSchema, ObjectSchema, Pattern, Schema, StringSchema,
};
pub use validate::{ValidationContext, ValidationError, ValidationErrors, ValidationResult, validate};

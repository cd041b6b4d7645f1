//! Builders for the structural schema of records and sum types.
//!
//! Both mirror serde's default encodings so a value produced by
//! `serde_json::to_value` validates against the derived schema.
use serde_json::Value;

use super::{JsonSchema, embedded};
use crate::schema::{ObjectSchema, Schema};

// ————————————————————————————————————————————————————————————————————————————
// RECORDS
// ————————————————————————————————————————————————————————————————————————————

/// Object schema of a struct, one field at a time in declaration order.
///
/// ```
/// use json_contract::{JsonSchema, Record, Schema};
///
/// struct Point { x: f64, y: f64, label: Option<String> }
///
/// impl JsonSchema for Point {
///     fn structural_schema() -> Schema {
///         Record::new()
///             .field::<f64>("x")
///             .field::<f64>("y")
///             .field::<Option<String>>("label")
///             .build()
///     }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    object: ObjectSchema,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Required unless `F` derives to an optional schema. Constraints `F`
    /// declares for itself come along.
    pub fn field<F: JsonSchema + ?Sized>(self, name: &str) -> Self {
        self.push(name, F::structural_schema(), embedded::<F>())
    }

    /// A field serde fills in when absent (`#[serde(default)]`); never
    /// required.
    pub fn field_with_default<F: JsonSchema + ?Sized>(self, name: &str, default: Value) -> Self {
        let structural = F::structural_schema().with_default(default.clone());
        self.push(name, structural, embedded::<F>().with_default(default))
    }

    /// `#[serde(deny_unknown_fields)]`.
    pub fn deny_unknown_fields(mut self) -> Self {
        self.object = self.object.deny_additional();
        self
    }

    pub fn build(self) -> Schema {
        Schema::Object(self.object)
    }

    // `required` follows the structure alone; the property holds the
    // constrained schema
    fn push(mut self, name: &str, structural: Schema, constrained: Schema) -> Self {
        self.object = self.object.field(name, structural);
        self.object.properties.insert(name.to_string(), constrained);
        self
    }

    fn into_object(self) -> ObjectSchema {
        self.object
    }
}

impl From<Record> for Schema {
    fn from(r: Record) -> Self {
        r.build()
    }
}

// ————————————————————————————————————————————————————————————————————————————
// SUM TYPES
// ————————————————————————————————————————————————————————————————————————————

/// How variants are told apart on the wire (serde's enum representations).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tagging {
    /// `{"Variant": payload}`, unit variants as `"Variant"`.
    External,
    /// `{"<tag>": "Variant", ...fields}`.
    Internal { tag: String },
    /// `{"<tag>": "Variant", "<content>": payload}`.
    Adjacent { tag: String, content: String },
    /// The payload alone.
    Untagged,
}

#[derive(Debug, Clone, PartialEq)]
enum Payload {
    Unit,
    Newtype(Schema),
    Tuple(Schema),
    Struct(ObjectSchema),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variants {
    tagging: Tagging,
    overlapping: bool,
    variants: Vec<(String, Payload)>,
}

impl Variants {
    pub fn new(tagging: Tagging) -> Self {
        Self { tagging, overlapping: false, variants: Vec::new() }
    }

    pub fn external() -> Self {
        Self::new(Tagging::External)
    }

    pub fn internal(tag: impl Into<String>) -> Self {
        Self::new(Tagging::Internal { tag: tag.into() })
    }

    pub fn adjacent(tag: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(Tagging::Adjacent { tag: tag.into(), content: content.into() })
    }

    pub fn untagged() -> Self {
        Self::new(Tagging::Untagged)
    }

    /// Variants may accept the same value: combine with `anyOf` rather
    /// than `oneOf`.
    pub fn overlapping(mut self) -> Self {
        self.overlapping = true;
        self
    }

    pub fn unit(mut self, name: impl Into<String>) -> Self {
        self.variants.push((name.into(), Payload::Unit));
        self
    }

    pub fn newtype<T: JsonSchema + ?Sized>(mut self, name: impl Into<String>) -> Self {
        self.variants.push((name.into(), Payload::Newtype(embedded::<T>())));
        self
    }

    /// `T` is the Rust tuple of the variant's fields, e.g. `(f64, f64)`.
    pub fn tuple<T: JsonSchema + ?Sized>(mut self, name: impl Into<String>) -> Self {
        self.variants.push((name.into(), Payload::Tuple(embedded::<T>())));
        self
    }

    pub fn record(mut self, name: impl Into<String>, fields: Record) -> Self {
        self.variants.push((name.into(), Payload::Struct(fields.into_object())));
        self
    }

    pub fn build(self) -> Schema {
        let Variants { tagging, overlapping, variants } = self;

        // all-unit external enums are a plain string enumeration
        if tagging == Tagging::External && variants.iter().all(|(_, p)| *p == Payload::Unit) {
            return Schema::enumeration(variants.into_iter().map(|(name, _)| Value::String(name)));
        }

        let branches: Vec<Schema> = variants
            .into_iter()
            .map(|(name, payload)| encode(&tagging, name, payload))
            .collect();

        if overlapping || tagging == Tagging::Untagged {
            Schema::AnyOf(branches)
        } else {
            Schema::OneOf(branches)
        }
    }
}

impl From<Variants> for Schema {
    fn from(v: Variants) -> Self {
        v.build()
    }
}

fn encode(tagging: &Tagging, name: String, payload: Payload) -> Schema {
    match tagging {
        Tagging::External => match payload {
            Payload::Unit => Schema::const_string(name),
            Payload::Newtype(s) | Payload::Tuple(s) => wrap_single(&name, s),
            Payload::Struct(o) => wrap_single(&name, Schema::Object(o)),
        },
        Tagging::Internal { tag } => {
            let marker = ObjectSchema::new().field(tag.as_str(), Schema::const_string(name));
            match payload {
                Payload::Unit => Schema::Object(marker),
                Payload::Struct(o) => Schema::Object(tagged(marker, o)),
                Payload::Newtype(mut s) | Payload::Tuple(mut s) => {
                    // merge into the object under any annotations
                    if let Schema::Object(o) = s.base_mut() {
                        *o = tagged(marker, std::mem::take(o));
                        s
                    } else {
                        Schema::AllOf(vec![Schema::Object(marker), s])
                    }
                }
            }
        }
        Tagging::Adjacent { tag, content } => {
            let marker = ObjectSchema::new().field(tag.as_str(), Schema::const_string(name));
            let object = match payload {
                Payload::Unit => marker,
                Payload::Newtype(s) | Payload::Tuple(s) => marker.field(content.as_str(), s),
                Payload::Struct(o) => marker.field(content.as_str(), Schema::Object(o)),
            };
            Schema::Object(object.deny_additional())
        }
        Tagging::Untagged => match payload {
            Payload::Unit => Schema::Null,
            Payload::Newtype(s) | Payload::Tuple(s) => s,
            Payload::Struct(o) => Schema::Object(o),
        },
    }
}

/// `{"<name>": inner}` with exactly that one key.
fn wrap_single(name: &str, inner: Schema) -> Schema {
    Schema::Object(ObjectSchema::new().field(name, inner).deny_additional())
}

/// The tag property first, then the variant's own fields.
fn tagged(marker: ObjectSchema, fields: ObjectSchema) -> ObjectSchema {
    let mut out = marker;
    for (name, schema) in fields.properties {
        if !out.properties.contains_key(&name) {
            out.properties.insert(name, schema);
        }
    }
    out.required.extend(fields.required);
    out.pattern_properties = fields.pattern_properties;
    out.additional_properties = fields.additional_properties;
    out
}

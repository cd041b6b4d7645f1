//! Schema data model.
//!
//! A [`Schema`] is an immutable value: build it once, share it across
//! threads, validate as many documents against it as needed. Leaves and
//! structural variants carry their constraints in dedicated structs;
//! modifiers wrap exactly one inner schema and forward every accessor they
//! don't override, so `s.with_title(..).with_description(..)` and
//! `s.with_description(..).with_title(..)` answer the same questions.
pub mod array;
pub mod emit;
pub mod numeric;
pub mod object;
pub mod parse;
pub mod pattern;
pub mod string;

use indexmap::IndexMap;
use serde_json::Value;

pub use array::ArraySchema;
pub use numeric::NumericSchema;
pub use object::{AdditionalProperties, ObjectSchema};
pub use pattern::Pattern;
pub use string::StringSchema;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    // -- leaves --
    Null,
    Boolean { const_value: Option<bool> },
    String(StringSchema),
    Integer(NumericSchema),
    Number(NumericSchema),
    /// Membership in an ordered, possibly heterogeneous list of values.
    Enum { values: Vec<Value> },

    // -- structural --
    Object(ObjectSchema),
    Array(ArraySchema),

    // -- composition --
    AllOf(Vec<Schema>),
    AnyOf(Vec<Schema>),
    OneOf(Vec<Schema>),
    Not(Box<Schema>),
    IfThenElse {
        condition: Box<Schema>,
        then_schema: Option<Box<Schema>>,
        else_schema: Option<Box<Schema>>,
    },
    /// Local reference: `#`, `#/$defs/<name>` or `#/definitions/<name>`.
    Ref(String),

    // -- modifiers --
    Optional(Box<Schema>),
    Nullable(Box<Schema>),
    WithDefault { inner: Box<Schema>, value: Value },
    WithTitle { inner: Box<Schema>, text: String },
    WithDescription { inner: Box<Schema>, text: String },
    WithDefs { inner: Box<Schema>, defs: IndexMap<String, Schema> },
    WithId { inner: Box<Schema>, uri: String },
    WithAnnotations { inner: Box<Schema>, annotations: Annotations },
}

/// Metadata keywords without a dedicated modifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotations {
    pub examples: Vec<Value>,
    pub deprecated: bool,
    pub read_only: bool,
    pub write_only: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// CONSTRUCTORS
// ————————————————————————————————————————————————————————————————————————————

impl Schema {
    /// Accepts every value (`{}`).
    pub fn any() -> Self {
        Schema::AllOf(Vec::new())
    }

    /// Rejects every value (`{"not": {}}`).
    pub fn never() -> Self {
        Schema::Not(Box::new(Schema::any()))
    }

    pub fn boolean() -> Self {
        Schema::Boolean { const_value: None }
    }

    pub fn string() -> Self {
        Schema::String(StringSchema::default())
    }

    pub fn integer() -> Self {
        Schema::Integer(NumericSchema::default())
    }

    pub fn number() -> Self {
        Schema::Number(NumericSchema::default())
    }

    pub fn const_string(value: impl Into<String>) -> Self {
        Schema::String(StringSchema::default().constant(value))
    }

    pub fn constant(value: Value) -> Self {
        Schema::Enum { values: vec![value] }
    }

    pub fn enumeration<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Schema::Enum { values: values.into_iter().collect() }
    }

    pub fn array_of(items: Schema) -> Self {
        Schema::Array(ArraySchema::of(items))
    }

    pub fn not(inner: Schema) -> Self {
        Schema::Not(Box::new(inner))
    }

    pub fn if_then_else(condition: Schema, then_schema: Option<Schema>, else_schema: Option<Schema>) -> Self {
        Schema::IfThenElse {
            condition: Box::new(condition),
            then_schema: then_schema.map(Box::new),
            else_schema: else_schema.map(Box::new),
        }
    }

    pub fn reference(target: impl Into<String>) -> Self {
        Schema::Ref(target.into())
    }
}

impl From<StringSchema> for Schema {
    fn from(s: StringSchema) -> Self {
        Schema::String(s)
    }
}

impl From<ObjectSchema> for Schema {
    fn from(o: ObjectSchema) -> Self {
        Schema::Object(o)
    }
}

impl From<ArraySchema> for Schema {
    fn from(a: ArraySchema) -> Self {
        Schema::Array(a)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// ACCESSORS
// ————————————————————————————————————————————————————————————————————————————

impl Schema {
    pub fn is_modifier(&self) -> bool {
        self.inner().is_some()
    }

    /// The schema a modifier wraps; `None` for every other variant.
    pub fn inner(&self) -> Option<&Schema> {
        match self {
            Schema::Optional(inner)
            | Schema::Nullable(inner)
            | Schema::WithDefault { inner, .. }
            | Schema::WithTitle { inner, .. }
            | Schema::WithDescription { inner, .. }
            | Schema::WithDefs { inner, .. }
            | Schema::WithId { inner, .. }
            | Schema::WithAnnotations { inner, .. } => Some(inner),
            _ => None,
        }
    }

    pub(crate) fn inner_mut(&mut self) -> Option<&mut Schema> {
        match self {
            Schema::Optional(inner)
            | Schema::Nullable(inner)
            | Schema::WithDefault { inner, .. }
            | Schema::WithTitle { inner, .. }
            | Schema::WithDescription { inner, .. }
            | Schema::WithDefs { inner, .. }
            | Schema::WithId { inner, .. }
            | Schema::WithAnnotations { inner, .. } => Some(inner),
            _ => None,
        }
    }

    /// The first non-modifier schema in the chain.
    pub fn base(&self) -> &Schema {
        match self.inner() {
            Some(inner) => inner.base(),
            None => self,
        }
    }

    pub(crate) fn base_mut(&mut self) -> &mut Schema {
        match self {
            Schema::Optional(inner)
            | Schema::Nullable(inner)
            | Schema::WithDefault { inner, .. }
            | Schema::WithTitle { inner, .. }
            | Schema::WithDescription { inner, .. }
            | Schema::WithDefs { inner, .. }
            | Schema::WithId { inner, .. }
            | Schema::WithAnnotations { inner, .. } => inner.base_mut(),
            other => other,
        }
    }

    pub fn is_optional(&self) -> bool {
        match self {
            Schema::Optional(_) => true,
            other => other.inner().is_some_and(Schema::is_optional),
        }
    }

    pub fn is_nullable(&self) -> bool {
        match self {
            Schema::Nullable(_) => true,
            other => other.inner().is_some_and(Schema::is_nullable),
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Schema::WithTitle { text, .. } => Some(text),
            other => other.inner()?.title(),
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Schema::WithDescription { text, .. } => Some(text),
            other => other.inner()?.description(),
        }
    }

    pub fn default_value(&self) -> Option<&Value> {
        match self {
            Schema::WithDefault { value, .. } => Some(value),
            other => other.inner()?.default_value(),
        }
    }

    pub fn defs(&self) -> Option<&IndexMap<String, Schema>> {
        match self {
            Schema::WithDefs { defs, .. } => Some(defs),
            other => other.inner()?.defs(),
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Schema::WithId { uri, .. } => Some(uri),
            other => other.inner()?.id(),
        }
    }

    pub fn annotations(&self) -> Option<&Annotations> {
        match self {
            Schema::WithAnnotations { annotations, .. } => Some(annotations),
            other => other.inner()?.annotations(),
        }
    }

    /// Short name of the base variant, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self.base() {
            Schema::Null => "null",
            Schema::Boolean { .. } => "boolean",
            Schema::String(_) => "string",
            Schema::Integer(_) => "integer",
            Schema::Number(_) => "number",
            Schema::Enum { .. } => "enum",
            Schema::Object(_) => "object",
            Schema::Array(_) => "array",
            Schema::AllOf(_) => "allOf",
            Schema::AnyOf(_) => "anyOf",
            Schema::OneOf(_) => "oneOf",
            Schema::Not(_) => "not",
            Schema::IfThenElse { .. } => "if",
            Schema::Ref(_) => "$ref",
            // base() never stops on a modifier
            _ => "modifier",
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// MODIFIER BUILDERS
// ————————————————————————————————————————————————————————————————————————————

// Each builder rewrites a modifier of the same kind already present in the
// chain rather than stacking a second one, which keeps repeated application
// idempotent.

impl Schema {
    pub fn optional(self) -> Schema {
        if self.is_optional() { self } else { Schema::Optional(Box::new(self)) }
    }

    pub fn nullable(self) -> Schema {
        if self.is_nullable() { self } else { Schema::Nullable(Box::new(self)) }
    }

    pub fn with_title(mut self, text: impl Into<String>) -> Schema {
        let text = text.into();
        if let Some(Schema::WithTitle { text: slot, .. }) =
            self.find_modifier_mut(|s| matches!(s, Schema::WithTitle { .. }))
        {
            *slot = text;
            return self;
        }
        Schema::WithTitle { inner: Box::new(self), text }
    }

    pub fn with_description(mut self, text: impl Into<String>) -> Schema {
        let text = text.into();
        if let Some(Schema::WithDescription { text: slot, .. }) =
            self.find_modifier_mut(|s| matches!(s, Schema::WithDescription { .. }))
        {
            *slot = text;
            return self;
        }
        Schema::WithDescription { inner: Box::new(self), text }
    }

    pub fn with_default(mut self, value: Value) -> Schema {
        if let Some(Schema::WithDefault { value: slot, .. }) =
            self.find_modifier_mut(|s| matches!(s, Schema::WithDefault { .. }))
        {
            *slot = value;
            return self;
        }
        Schema::WithDefault { inner: Box::new(self), value }
    }

    pub fn with_defs(mut self, defs: IndexMap<String, Schema>) -> Schema {
        if let Some(Schema::WithDefs { defs: slot, .. }) =
            self.find_modifier_mut(|s| matches!(s, Schema::WithDefs { .. }))
        {
            *slot = defs;
            return self;
        }
        Schema::WithDefs { inner: Box::new(self), defs }
    }

    pub fn with_id(mut self, uri: impl Into<String>) -> Schema {
        let uri = uri.into();
        if let Some(Schema::WithId { uri: slot, .. }) =
            self.find_modifier_mut(|s| matches!(s, Schema::WithId { .. }))
        {
            *slot = uri;
            return self;
        }
        Schema::WithId { inner: Box::new(self), uri }
    }

    pub fn with_examples(self, examples: Vec<Value>) -> Schema {
        self.update_annotations(|a| a.examples = examples)
    }

    pub fn deprecated(self) -> Schema {
        self.update_annotations(|a| a.deprecated = true)
    }

    pub fn read_only(self) -> Schema {
        self.update_annotations(|a| a.read_only = true)
    }

    pub fn write_only(self) -> Schema {
        self.update_annotations(|a| a.write_only = true)
    }

    fn update_annotations(mut self, update: impl FnOnce(&mut Annotations)) -> Schema {
        if let Some(Schema::WithAnnotations { annotations, .. }) =
            self.find_modifier_mut(|s| matches!(s, Schema::WithAnnotations { .. }))
        {
            update(annotations);
            return self;
        }
        let mut annotations = Annotations::default();
        update(&mut annotations);
        Schema::WithAnnotations { inner: Box::new(self), annotations }
    }

    fn find_modifier_mut(&mut self, pred: fn(&Schema) -> bool) -> Option<&mut Schema> {
        if pred(self) {
            return Some(self);
        }
        self.inner_mut()?.find_modifier_mut(pred)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn modifiers_forward_unrelated_accessors() {
        let s = Schema::integer().with_default(json!(3)).with_title("Count").optional();
        assert_eq!(s.title(), Some("Count"));
        assert_eq!(s.default_value(), Some(&json!(3)));
        assert!(s.is_optional());
        assert!(!s.is_nullable());
        assert_eq!(s.kind_name(), "integer");
        assert!(matches!(s.base(), Schema::Integer(_)));
    }

    #[test]
    fn wrap_order_does_not_matter_for_accessors() {
        let a = Schema::string().with_title("T").with_description("D");
        let b = Schema::string().with_description("D").with_title("T");
        assert_eq!(a.title(), b.title());
        assert_eq!(a.description(), b.description());
        assert_eq!(a.to_json_schema(), b.to_json_schema());
    }

    #[test]
    fn repeated_builders_rewrite_instead_of_stacking() {
        let s = Schema::string().with_title("a").with_description("d").with_title("b");
        assert_eq!(s.title(), Some("b"));
        // only one WithTitle in the chain
        let mut titles = 0;
        let mut cur = Some(&s);
        while let Some(node) = cur {
            if matches!(node, Schema::WithTitle { .. }) {
                titles += 1;
            }
            cur = node.inner();
        }
        assert_eq!(titles, 1);
    }

    #[test]
    fn optional_and_nullable_are_idempotent() {
        let s = Schema::string().nullable().optional();
        assert_eq!(s.clone().optional(), s);
        assert_eq!(s.clone().nullable(), s);
    }

    #[test]
    fn annotations_accumulate_on_one_modifier() {
        let s = Schema::string().deprecated().read_only().with_examples(vec![json!("x")]);
        let a = s.annotations().unwrap();
        assert!(a.deprecated && a.read_only && !a.write_only);
        assert_eq!(a.examples, vec![json!("x")]);
        assert!(matches!(s.inner(), Some(Schema::String(_))));
    }

    #[test]
    fn outermost_modifier_wins_when_nested_by_hand() {
        let s = Schema::WithTitle {
            inner: Box::new(Schema::WithTitle { inner: Box::new(Schema::Null), text: "inner".into() }),
            text: "outer".into(),
        };
        assert_eq!(s.title(), Some("outer"));
    }
}

use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;

use super::JsonSchema;

/// One externally declared constraint or annotation.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    // -- annotations --
    Title(String),
    Description(String),
    Default(Value),
    Examples(Vec<Value>),
    Deprecated,
    ReadOnly,
    WriteOnly,

    // -- numeric --
    Minimum(f64),
    Maximum(f64),
    ExclusiveMinimum(f64),
    ExclusiveMaximum(f64),
    MultipleOf(f64),

    // -- string --
    MinLength(u64),
    MaxLength(u64),
    Pattern(String),
    Format(String),

    // -- array --
    MinItems(u64),
    MaxItems(u64),
    UniqueItems,

    /// Narrows a string or enum schema to the listed values.
    Enum(Vec<Value>),
}

impl Constraint {
    /// The JSON Schema keyword this constraint ends up as.
    pub fn keyword(&self) -> &'static str {
        match self {
            Constraint::Title(_) => "title",
            Constraint::Description(_) => "description",
            Constraint::Default(_) => "default",
            Constraint::Examples(_) => "examples",
            Constraint::Deprecated => "deprecated",
            Constraint::ReadOnly => "readOnly",
            Constraint::WriteOnly => "writeOnly",
            Constraint::Minimum(_) => "minimum",
            Constraint::Maximum(_) => "maximum",
            Constraint::ExclusiveMinimum(_) => "exclusiveMinimum",
            Constraint::ExclusiveMaximum(_) => "exclusiveMaximum",
            Constraint::MultipleOf(_) => "multipleOf",
            Constraint::MinLength(_) => "minLength",
            Constraint::MaxLength(_) => "maxLength",
            Constraint::Pattern(_) => "pattern",
            Constraint::Format(_) => "format",
            Constraint::MinItems(_) => "minItems",
            Constraint::MaxItems(_) => "maxItems",
            Constraint::UniqueItems => "uniqueItems",
            Constraint::Enum(_) => "enum",
        }
    }

    /// Annotations wrap any schema; everything else needs a matching base.
    pub fn is_annotation(&self) -> bool {
        matches!(
            self,
            Constraint::Title(_)
                | Constraint::Description(_)
                | Constraint::Default(_)
                | Constraint::Examples(_)
                | Constraint::Deprecated
                | Constraint::ReadOnly
                | Constraint::WriteOnly
        )
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Constraints declared for a type, its fields, and its element types.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeMetadata {
    pub constraints: Vec<Constraint>,
    pub fields: IndexMap<String, FieldMetadata>,
    /// Applied to an array's `items`.
    pub items: Option<Box<TypeMetadata>>,
    /// Applied to a map's value schema (`additionalProperties`).
    pub values: Option<Box<TypeMetadata>>,
}

impl TypeMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constraint(mut self, c: Constraint) -> Self {
        self.constraints.push(c);
        self
    }

    pub fn title(self, text: impl Into<String>) -> Self {
        self.constraint(Constraint::Title(text.into()))
    }

    pub fn description(self, text: impl Into<String>) -> Self {
        self.constraint(Constraint::Description(text.into()))
    }

    pub fn field(mut self, name: impl Into<String>, meta: FieldMetadata) -> Self {
        self.fields.insert(name.into(), meta);
        self
    }

    /// Like [`field`](Self::field), also pulling in `F`'s own metadata so
    /// constraints declared on the field's type reach the nested schema.
    pub fn field_of<F: JsonSchema + ?Sized>(self, name: impl Into<String>, meta: FieldMetadata) -> Self {
        let nested = F::metadata();
        let meta = if nested.is_empty() { meta } else { meta.nested(nested) };
        self.field(name, meta)
    }

    /// A field with no constraints of its own whose type carries metadata.
    pub fn nested<F: JsonSchema + ?Sized>(self, name: impl Into<String>) -> Self {
        self.field_of::<F>(name, FieldMetadata::new())
    }

    pub fn items(mut self, meta: TypeMetadata) -> Self {
        self.items = Some(Box::new(meta));
        self
    }

    pub fn values(mut self, meta: TypeMetadata) -> Self {
        self.values = Some(Box::new(meta));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty() && self.fields.is_empty() && self.items.is_none() && self.values.is_none()
    }

    /// `Some(self)` unless empty; used by container impls so an empty
    /// element metadata doesn't show up as an explicit `items` entry.
    pub(crate) fn non_empty(self) -> Option<Box<TypeMetadata>> {
        if self.is_empty() { None } else { Some(Box::new(self)) }
    }
}

/// Constraints for one record field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMetadata {
    pub constraints: Vec<Constraint>,
    /// Metadata for the field's own type (its fields, items, ...).
    pub nested: Option<TypeMetadata>,
}

impl FieldMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of<I: IntoIterator<Item = Constraint>>(constraints: I) -> Self {
        Self { constraints: constraints.into_iter().collect(), nested: None }
    }

    pub fn constraint(mut self, c: Constraint) -> Self {
        self.constraints.push(c);
        self
    }

    pub fn nested(mut self, meta: TypeMetadata) -> Self {
        self.nested = Some(meta);
        self
    }
}

impl From<Constraint> for FieldMetadata {
    fn from(c: Constraint) -> Self {
        FieldMetadata::of([c])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;

    struct Inner;

    impl JsonSchema for Inner {
        fn structural_schema() -> Schema {
            Schema::string()
        }

        fn metadata() -> TypeMetadata {
            TypeMetadata::new().title("Inner")
        }
    }

    #[test]
    fn field_of_pulls_nested_metadata() {
        let meta = TypeMetadata::new().field_of::<Inner>("x", Constraint::MinLength(1).into());
        let x = &meta.fields["x"];
        assert_eq!(x.constraints, vec![Constraint::MinLength(1)]);
        assert_eq!(x.nested.as_ref().unwrap().constraints, vec![Constraint::Title("Inner".into())]);
    }

    #[test]
    fn empty_nested_metadata_is_dropped() {
        let meta = TypeMetadata::new().nested::<String>("s");
        assert!(meta.fields["s"].nested.is_none());
    }

    #[test]
    fn keyword_names_match_json_schema() {
        assert_eq!(Constraint::ExclusiveMinimum(0.0).keyword(), "exclusiveMinimum");
        assert_eq!(Constraint::UniqueItems.to_string(), "uniqueItems");
        assert!(Constraint::ReadOnly.is_annotation());
        assert!(!Constraint::Pattern("x".into()).is_annotation());
    }
}

use indexmap::{IndexMap, IndexSet};

use super::{Pattern, Schema};
use crate::error::SchemaError;

/// What happens to keys matched by neither `properties` nor
/// `patternProperties`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AdditionalProperties {
    Deny,
    #[default]
    Allow,
    Schema(Box<Schema>),
}

/// Constraints of a `{"type": "object"}` schema.
///
/// `required` keeps declaration order so missing-field errors come out in a
/// stable order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    pub properties: IndexMap<String, Schema>,
    pub required: IndexSet<String>,
    pub pattern_properties: Vec<(Pattern, Schema)>,
    pub additional_properties: AdditionalProperties,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a property without touching `required`.
    pub fn property(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    /// Declares a property and marks it required unless the schema is
    /// optional or carries a default.
    pub fn field(mut self, name: impl Into<String>, schema: Schema) -> Self {
        let name = name.into();
        if !schema.is_optional() && schema.default_value().is_none() {
            self.required.insert(name.clone());
        }
        self.properties.insert(name, schema);
        self
    }

    pub fn require<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn pattern_property(mut self, source: &str, schema: Schema) -> Result<Self, SchemaError> {
        self.pattern_properties.push((Pattern::new(source)?, schema));
        Ok(self)
    }

    pub fn deny_additional(mut self) -> Self {
        self.additional_properties = AdditionalProperties::Deny;
        self
    }

    pub fn additional(mut self, schema: Schema) -> Self {
        self.additional_properties = AdditionalProperties::Schema(Box::new(schema));
        self
    }
}

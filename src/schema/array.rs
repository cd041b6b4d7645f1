use super::Schema;

/// Constraints of a `{"type": "array"}` schema.
///
/// With `prefix_items` set the array is a tuple: position `i` validates
/// against `prefix_items[i]` and the tail against `items`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArraySchema {
    pub items: Box<Schema>,
    pub prefix_items: Option<Vec<Schema>>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
    pub unique_items: bool,
    pub contains: Option<Box<Schema>>,
    pub min_contains: Option<u64>,
    pub max_contains: Option<u64>,
}

impl ArraySchema {
    pub fn of(items: Schema) -> Self {
        Self {
            items: Box::new(items),
            prefix_items: None,
            min_items: None,
            max_items: None,
            unique_items: false,
            contains: None,
            min_contains: None,
            max_contains: None,
        }
    }

    /// Fixed-arity tuple: no items past the prefix.
    pub fn tuple(elems: Vec<Schema>) -> Self {
        let len = elems.len() as u64;
        Self {
            prefix_items: Some(elems),
            min_items: Some(len),
            max_items: Some(len),
            ..Self::of(Schema::never())
        }
    }

    pub fn min_items(mut self, n: u64) -> Self {
        self.min_items = Some(n);
        self
    }

    pub fn max_items(mut self, n: u64) -> Self {
        self.max_items = Some(n);
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique_items = true;
        self
    }

    pub fn prefix(mut self, elems: Vec<Schema>) -> Self {
        self.prefix_items = Some(elems);
        self
    }

    pub fn contains(mut self, schema: Schema) -> Self {
        self.contains = Some(Box::new(schema));
        self
    }

    pub fn min_contains(mut self, n: u64) -> Self {
        self.min_contains = Some(n);
        self
    }

    pub fn max_contains(mut self, n: u64) -> Self {
        self.max_contains = Some(n);
        self
    }
}

impl Default for ArraySchema {
    fn default() -> Self {
        Self::of(Schema::any())
    }
}

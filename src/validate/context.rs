use std::borrow::Cow;

use crate::config::ValidationConfig;
use crate::schema::Schema;

/// Where the validator currently stands in the document.
///
/// Immutable: stepping into a property or an index yields a new context,
/// so sibling branches never observe each other's paths.
#[derive(Debug, Clone)]
pub struct ValidationContext<'a> {
    pointer: String,
    root: Option<&'a Schema>,
    config: ValidationConfig,
    // `$ref` targets followed since the last step into the document
    refs: Vec<String>,
}

impl<'a> ValidationContext<'a> {
    /// Context at `/` with no root schema; `$ref`s cannot resolve.
    pub fn new() -> Self {
        Self { pointer: "/".to_string(), root: None, config: ValidationConfig::default(), refs: Vec::new() }
    }

    /// Context at `/` whose `$ref`s resolve against `root`.
    pub fn for_root(root: &'a Schema) -> Self {
        Self { root: Some(root), ..Self::new() }
    }

    pub fn with_config(mut self, config: ValidationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_property(&self, name: &str) -> Self {
        self.descend(&escape_pointer_segment(name))
    }

    pub fn with_index(&self, index: usize) -> Self {
        self.descend(&index.to_string())
    }

    /// JSON pointer of the current location (`/` at the root).
    pub fn path(&self) -> &str {
        &self.pointer
    }

    pub fn root(&self) -> Option<&'a Schema> {
        self.root
    }

    pub fn config(&self) -> ValidationConfig {
        self.config
    }

    fn descend(&self, segment: &str) -> Self {
        let pointer = if self.pointer == "/" {
            format!("/{segment}")
        } else {
            format!("{}/{segment}", self.pointer)
        };
        Self { pointer, root: self.root, config: self.config, refs: Vec::new() }
    }

    /// Same location, through `target`; `None` if `target` was already
    /// followed here, since that chain never consumes any of the document.
    pub(crate) fn follow_ref(&self, target: &str) -> Option<Self> {
        if self.refs.iter().any(|seen| seen == target) {
            return None;
        }
        let mut next = self.clone();
        next.refs.push(target.to_string());
        Some(next)
    }
}

impl Default for ValidationContext<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// RFC 6901: `~` → `~0`, `/` → `~1`.
pub(crate) fn escape_pointer_segment(segment: &str) -> Cow<'_, str> {
    if segment.contains(['~', '/']) {
        Cow::Owned(segment.replace('~', "~0").replace('/', "~1"))
    } else {
        Cow::Borrowed(segment)
    }
}

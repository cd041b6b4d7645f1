/// Knobs for a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationConfig {
    /// When false every `format` is a pure annotation.
    pub assert_formats: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self { assert_formats: true }
    }
}

/// Knobs for schema derivation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeriveConfig {
    /// Close every derived object that declares properties
    /// (`additionalProperties: false`).
    pub strict_mode: bool,
}

impl DeriveConfig {
    pub fn strict() -> Self {
        Self { strict_mode: true }
    }
}

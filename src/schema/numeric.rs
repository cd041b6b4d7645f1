/// Constraints shared by `{"type": "integer"}` and `{"type": "number"}`.
///
/// Bounds are kept as `f64`; integers beyond 2^53 compare approximately.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumericSchema {
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: Option<f64>,
    pub exclusive_maximum: Option<f64>,
    pub multiple_of: Option<f64>,
    pub const_value: Option<f64>,
}

impl NumericSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn minimum(mut self, n: f64) -> Self {
        self.minimum = Some(n);
        self
    }

    pub fn maximum(mut self, n: f64) -> Self {
        self.maximum = Some(n);
        self
    }

    pub fn range(self, min: f64, max: f64) -> Self {
        self.minimum(min).maximum(max)
    }

    pub fn exclusive_minimum(mut self, n: f64) -> Self {
        self.exclusive_minimum = Some(n);
        self
    }

    pub fn exclusive_maximum(mut self, n: f64) -> Self {
        self.exclusive_maximum = Some(n);
        self
    }

    pub fn multiple_of(mut self, n: f64) -> Self {
        self.multiple_of = Some(n);
        self
    }

    pub fn constant(mut self, n: f64) -> Self {
        self.const_value = Some(n);
        self
    }
}

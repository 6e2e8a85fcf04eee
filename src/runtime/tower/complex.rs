use crate::runtime::tower::Value;

/// Rectangular complex number whose parts are real tower values.
///
/// Parts keep their own representation, so `(1/2, 3)` stays exact.
#[derive(Debug, Clone, PartialEq)]
pub struct Complex {
    pub re: Value,
    pub im: Value,
}

impl Complex {
    pub fn new(re: Value, im: Value) -> Self {
        debug_assert!(re.is_real() && im.is_real(), "Complex::new: non-real part");
        Self { re, im }
    }

    pub fn from_real(re: Value) -> Self {
        Self::new(re, Value::Integer(0))
    }

    pub fn is_zero(&self) -> bool {
        self.re.is_zero() && self.im.is_zero()
    }
}

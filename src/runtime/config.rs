use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::runtime::{
    error::{Result, RuntimeError},
    gc::{PayloadLimits, gc_heap::DEFAULT_HEAP_BYTES, heap_object::decimal_mantissa_bytes},
};

pub const MIN_PRECISION: usize = 3;
pub const MAX_PRECISION: usize = 2000;

/// Unit used by angle-producing operations such as `atan2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleMode {
    #[default]
    Radians,
    Degrees,
    Grads,
}

/// Load-once runtime settings.
///
/// Read from a JSON file and overridden by command line flags. Only
/// `precision` (through `PREC`) and `unit_mode` change while the command
/// loop runs, and only between commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Significant decimal digits kept by decimal results.
    pub precision: usize,
    pub heap_bytes: usize,
    /// Payload ceiling for expressions and programs.
    pub max_payload_bytes: usize,
    pub max_bignum_bits: usize,
    /// Largest decimal exponent magnitude, in both directions.
    pub max_exponent: i64,
    /// When false, a non-exact integer division yields a decimal instead of
    /// a fraction.
    pub exact_division: bool,
    pub angle_mode: AngleMode,
    pub units_file: Option<String>,
    /// When set, evaluating an algebraic turns symbols that name units into
    /// unit objects, so `'3*km'` evaluates to `3_km`.
    pub unit_mode: bool,
    /// Collapse repeated key codes that arrive without a release.
    pub key_repeat_suppression: bool,
    pub gc_enabled: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            precision: 24,
            heap_bytes: DEFAULT_HEAP_BYTES,
            max_payload_bytes: 4096,
            max_bignum_bits: 4096,
            max_exponent: 499_999,
            exact_division: true,
            angle_mode: AngleMode::Radians,
            units_file: None,
            unit_mode: false,
            key_repeat_suppression: true,
            gc_enabled: true,
        }
    }
}

impl RuntimeConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: RuntimeConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_PRECISION..=MAX_PRECISION).contains(&self.precision) {
            return Err(RuntimeError::Config(format!(
                "precision {} is outside {}..={}",
                self.precision, MIN_PRECISION, MAX_PRECISION
            )));
        }
        if self.max_bignum_bits < 64 {
            return Err(RuntimeError::Config(format!(
                "max_bignum_bits {} is below 64",
                self.max_bignum_bits
            )));
        }
        if self.max_exponent < 10 {
            return Err(RuntimeError::Config(format!(
                "max_exponent {} is below 10",
                self.max_exponent
            )));
        }
        if self.max_payload_bytes < 64 {
            return Err(RuntimeError::Config(format!(
                "max_payload_bytes {} is below 64",
                self.max_payload_bytes
            )));
        }
        Ok(())
    }

    /// Changes the working precision, rejecting out-of-range values.
    pub fn set_precision(&mut self, digits: usize) -> Result<()> {
        if !(MIN_PRECISION..=MAX_PRECISION).contains(&digits) {
            return Err(RuntimeError::BadArgumentValue(format!(
                "precision {digits} is outside {MIN_PRECISION}..={MAX_PRECISION}"
            )));
        }
        self.precision = digits;
        Ok(())
    }

    pub fn payload_limits(&self) -> PayloadLimits {
        let max_bignum_bytes = self.max_bignum_bits.div_ceil(8);
        PayloadLimits {
            max_bignum_bytes,
            max_decimal_bytes: max_bignum_bytes.max(decimal_mantissa_bytes(self.precision)),
            max_payload_bytes: self.max_payload_bytes,
        }
    }
}

//! Generic binary-operator evaluator.
//!
//! Every arithmetic command is an [`Operator`] descriptor: one optional
//! implementation per tower level plus policies. [`evaluate`] promotes the
//! operands and walks the tower until an implementation answers.

pub mod complex_ops;
pub mod evaluate;
pub mod operator;
pub mod operators;
pub mod percent;
pub mod promotion;
pub mod unary;

#[cfg(test)]
mod evaluate_test;

pub use evaluate::{check_limits, evaluate, evaluate_handles, symbolic};
pub use operator::Operator;
pub use operators::{OPERATORS, operator_for};
pub use promotion::{Promoted, common_level, promote};
pub use unary::UnaryOp;

use crate::runtime::{
    config::{AngleMode, RuntimeConfig},
    units::UnitTable,
};

/// Configuration snapshot for one evaluation.
///
/// Built by the command loop before each command and never changed while the
/// command runs.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    pub precision: usize,
    pub max_exponent: i64,
    pub max_bignum_bits: u64,
    pub exact_division: bool,
    pub angle_mode: AngleMode,
    /// Unit names in algebraics evaluate to unit objects.
    pub unit_mode: bool,
    pub units: &'a UnitTable,
}

impl<'a> EvalContext<'a> {
    pub fn new(config: &RuntimeConfig, units: &'a UnitTable) -> Self {
        EvalContext {
            precision: config.precision,
            max_exponent: config.max_exponent,
            max_bignum_bits: config.max_bignum_bits as u64,
            exact_division: config.exact_division,
            angle_mode: config.angle_mode,
            unit_mode: config.unit_mode,
            units,
        }
    }
}

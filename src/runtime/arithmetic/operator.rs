use num_bigint::BigInt;

use crate::runtime::{
    arithmetic::EvalContext,
    error::Result,
    expr::ExprOp,
    tower::{Complex, Decimal, Fraction, Level, Value},
};

/// Small-integer implementation. `None` means the result does not fit (or is
/// not an integer) and evaluation moves up the tower.
pub type IntegerImpl = fn(i64, i64) -> Option<i64>;

/// Level implementations return `Ok(None)` to escalate to the next level.
pub type BignumImpl = fn(&BigInt, &BigInt, &EvalContext<'_>) -> Result<Option<Value>>;
pub type FractionImpl = fn(&Fraction, &Fraction, &EvalContext<'_>) -> Result<Option<Value>>;
pub type DecimalImpl = fn(&Decimal, &Decimal, &EvalContext<'_>) -> Result<Option<Value>>;
pub type ComplexImpl = fn(&Complex, &Complex, &EvalContext<'_>) -> Result<Option<Value>>;

/// Fallback for operands outside the numeric tower.
pub type NonNumericImpl = fn(&Operator, &Value, &Value, &EvalContext<'_>) -> Result<Value>;

/// Operators defined entirely in terms of other operators.
pub type CompositeImpl = fn(&Value, &Value, &EvalContext<'_>) -> Result<Value>;

/// Descriptor of one binary operator: an optional implementation per tower
/// level plus the policies the evaluator applies around them.
pub struct Operator {
    /// Command spelling, e.g. `+` or `HYPOT`.
    pub name: &'static str,
    /// Verb used in error messages.
    pub verb: &'static str,
    pub expr_op: ExprOp,
    pub integer: Option<IntegerImpl>,
    pub bignum: Option<BignumImpl>,
    pub fraction: Option<FractionImpl>,
    pub decimal: Option<DecimalImpl>,
    pub complex: Option<ComplexImpl>,
    pub non_numeric: Option<NonNumericImpl>,
    pub composite: Option<CompositeImpl>,
    /// Fail with `DivisionByZero` when the promoted second operand is zero.
    pub zero_divisor: bool,
    /// May escalate real operands to the complex level.
    pub allows_complex: bool,
}

impl Operator {
    pub fn implements(&self, level: Level) -> bool {
        match level {
            Level::Integer => self.integer.is_some(),
            Level::Bignum => self.bignum.is_some(),
            Level::Fraction => self.fraction.is_some(),
            Level::Decimal => self.decimal.is_some(),
            Level::Complex => self.complex.is_some(),
        }
    }
}

impl std::fmt::Debug for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operator").field("name", &self.name).finish()
    }
}

impl PartialEq for Operator {
    fn eq(&self, other: &Self) -> bool {
        self.expr_op == other.expr_op
    }
}

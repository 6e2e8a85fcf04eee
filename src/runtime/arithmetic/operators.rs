//! Descriptor tables for the binary operators.

use num_bigint::BigInt;
use num_integer::{Integer, Roots};
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::runtime::{
    arithmetic::{
        EvalContext, complex_ops,
        evaluate::symbolic,
        operator::{NonNumericImpl, Operator},
        percent,
    },
    config::AngleMode,
    error::{Result, RuntimeError},
    expr::ExprOp,
    tower::{
        Decimal, Fraction, Value,
        decimal::EXACT,
        decimal_math,
    },
};

const SYMBOLIC: Option<NonNumericImpl> = Some(symbolic);

fn big(value: BigInt) -> Result<Option<Value>> {
    Ok(Some(Value::from_bigint(value)))
}

fn frac(value: Fraction) -> Result<Option<Value>> {
    Ok(Some(Value::from_fraction(value)))
}

fn dec(value: Decimal) -> Result<Option<Value>> {
    Ok(Some(Value::Decimal(value)))
}

// Add

pub static ADD: Operator = Operator {
    name: "+",
    verb: "add",
    expr_op: ExprOp::Add,
    integer: Some(|a, b| a.checked_add(b)),
    bignum: Some(|a, b, _| big(a + b)),
    fraction: Some(|a, b, _| frac(a.add(b))),
    decimal: Some(|a, b, ctx| dec(a.add(b, ctx.precision))),
    complex: Some(complex_ops::add),
    non_numeric: SYMBOLIC,
    composite: None,
    zero_divisor: false,
    allows_complex: false,
};

// Sub

pub static SUB: Operator = Operator {
    name: "-",
    verb: "subtract",
    expr_op: ExprOp::Sub,
    integer: Some(|a, b| a.checked_sub(b)),
    bignum: Some(|a, b, _| big(a - b)),
    fraction: Some(|a, b, _| frac(a.sub(b))),
    decimal: Some(|a, b, ctx| dec(a.sub(b, ctx.precision))),
    complex: Some(complex_ops::sub),
    non_numeric: SYMBOLIC,
    composite: None,
    zero_divisor: false,
    allows_complex: false,
};

// Mul

pub static MUL: Operator = Operator {
    name: "*",
    verb: "multiply",
    expr_op: ExprOp::Mul,
    integer: Some(|a, b| a.checked_mul(b)),
    bignum: Some(|a, b, _| big(a * b)),
    fraction: Some(|a, b, _| frac(a.mul(b))),
    decimal: Some(|a, b, ctx| dec(a.mul(b, ctx.precision))),
    complex: Some(complex_ops::mul),
    non_numeric: SYMBOLIC,
    composite: None,
    zero_divisor: false,
    allows_complex: false,
};

// Div

fn int_div(a: i64, b: i64) -> Option<i64> {
    if a.checked_rem(b)? == 0 {
        a.checked_div(b)
    } else {
        None
    }
}

fn bignum_div(a: &BigInt, b: &BigInt, _: &EvalContext<'_>) -> Result<Option<Value>> {
    let (q, r) = a.div_rem(b);
    if r.is_zero() { big(q) } else { Ok(None) }
}

fn fraction_div(a: &Fraction, b: &Fraction, _: &EvalContext<'_>) -> Result<Option<Value>> {
    a.div(b).map_or(Err(RuntimeError::DivisionByZero), frac)
}

fn decimal_div(a: &Decimal, b: &Decimal, ctx: &EvalContext<'_>) -> Result<Option<Value>> {
    a.div(b, ctx.precision)
        .map_or(Err(RuntimeError::DivisionByZero), dec)
}

pub static DIV: Operator = Operator {
    name: "/",
    verb: "divide",
    expr_op: ExprOp::Div,
    integer: Some(int_div),
    bignum: Some(bignum_div),
    fraction: Some(fraction_div),
    decimal: Some(decimal_div),
    complex: Some(complex_ops::div),
    non_numeric: SYMBOLIC,
    composite: None,
    zero_divisor: true,
    allows_complex: false,
};

// Mod and rem

fn int_mod(a: i64, b: i64) -> Option<i64> {
    let r = a.checked_rem(b)?;
    if r != 0 && (r < 0) != (b < 0) {
        Some(r + b)
    } else {
        Some(r)
    }
}

/// `a - b * q` with `q` the quotient rounded down (`floor`) or toward zero.
fn fraction_remainder(a: &Fraction, b: &Fraction, floor: bool) -> Result<Option<Value>> {
    let quotient = a.div(b).ok_or(RuntimeError::DivisionByZero)?;
    let q = if floor {
        quotient.floor()
    } else {
        quotient.trunc()
    };
    frac(a.sub(&b.mul(&Fraction::from_integer(q))))
}

/// Decimal remainder with an exactly computed integer quotient.
///
/// The quotient is approximated at enough digits to hold its integer part,
/// then corrected so the remainder has the required sign.
fn decimal_remainder(
    a: &Decimal,
    b: &Decimal,
    floor: bool,
    ctx: &EvalContext<'_>,
) -> Result<Option<Value>> {
    let scale = (a.adjusted_exponent() - b.adjusted_exponent()).max(0) as usize;
    let wp = ctx.precision + scale + 2;
    let quotient = a.div(b, wp).ok_or(RuntimeError::DivisionByZero)?;
    let mut q = if floor {
        quotient.floor()
    } else {
        quotient.trunc()
    };
    let remainder = |q: &BigInt| a.sub(&b.mul(&Decimal::from_bigint(q.clone()), EXACT), EXACT);
    let mut r = remainder(&q);
    // The remainder takes the sign of the divisor (floor) or the dividend
    // (trunc) and stays below the divisor in magnitude.
    let target_negative = if floor { b.is_negative() } else { a.is_negative() };
    let step = if target_negative == b.is_negative() {
        BigInt::one()
    } else {
        -BigInt::one()
    };
    if !r.is_zero() && r.is_negative() != target_negative {
        q -= &step;
        r = remainder(&q);
    } else if r.abs() >= b.abs() {
        q += &step;
        r = remainder(&q);
    }
    dec(r.round(ctx.precision))
}

pub static MOD: Operator = Operator {
    name: "MOD",
    verb: "take the modulo of",
    expr_op: ExprOp::Mod,
    integer: Some(int_mod),
    bignum: Some(|a, b, _| big(a.mod_floor(b))),
    fraction: Some(|a, b, _| fraction_remainder(a, b, true)),
    decimal: Some(|a, b, ctx| decimal_remainder(a, b, true, ctx)),
    complex: None,
    non_numeric: SYMBOLIC,
    composite: None,
    zero_divisor: true,
    allows_complex: false,
};

pub static REM: Operator = Operator {
    name: "REM",
    verb: "take the remainder of",
    expr_op: ExprOp::Rem,
    integer: Some(|a, b| a.checked_rem(b)),
    bignum: Some(|a, b, _| big(a % b)),
    fraction: Some(|a, b, _| fraction_remainder(a, b, false)),
    decimal: Some(|a, b, ctx| decimal_remainder(a, b, false, ctx)),
    complex: None,
    non_numeric: SYMBOLIC,
    composite: None,
    zero_divisor: true,
    allows_complex: false,
};

// Pow

fn int_pow(a: i64, b: i64) -> Option<i64> {
    a.checked_pow(u32::try_from(b).ok()?)
}

fn bignum_pow(a: &BigInt, b: &BigInt, ctx: &EvalContext<'_>) -> Result<Option<Value>> {
    if b.is_negative() {
        return Ok(None);
    }
    if a.is_zero() {
        return big(if b.is_zero() { BigInt::one() } else { BigInt::zero() });
    }
    if a.abs().is_one() {
        let negative = a.is_negative() && b.is_odd();
        return big(if negative { -BigInt::one() } else { BigInt::one() });
    }
    let overflow = RuntimeError::Overflow {
        representation: "Big integer",
    };
    let exponent = b.to_u64().ok_or(overflow.clone())?;
    if (a.bits() - 1).saturating_mul(exponent) > ctx.max_bignum_bits {
        return Err(overflow);
    }
    big(num_traits::pow(a.clone(), exponent as usize))
}

fn fraction_pow(a: &Fraction, b: &Fraction, ctx: &EvalContext<'_>) -> Result<Option<Value>> {
    if !b.is_integer() {
        return Ok(None);
    }
    let overflow = RuntimeError::Overflow {
        representation: "Fraction",
    };
    let exponent = b.numer();
    let magnitude = exponent.abs().to_u32().ok_or(overflow.clone())?;
    if a.bits().saturating_sub(1).saturating_mul(u64::from(magnitude)) > ctx.max_bignum_bits {
        return Err(overflow);
    }
    match a.powi(magnitude, exponent.is_negative()) {
        Some(result) => frac(result),
        None => Err(RuntimeError::DivisionByZero),
    }
}

fn decimal_pow(a: &Decimal, b: &Decimal, ctx: &EvalContext<'_>) -> Result<Option<Value>> {
    if b.is_integer() && b.adjusted_exponent() <= 18 {
        return match decimal_math::powi(a, &b.floor(), ctx.precision) {
            Some(result) => dec(result),
            None => Err(RuntimeError::DivisionByZero),
        };
    }
    if a.is_zero() {
        return if b.is_negative() {
            Err(RuntimeError::DivisionByZero)
        } else {
            dec(Decimal::zero())
        };
    }
    // A negative base with a non-integer exponent needs the complex level.
    Ok(decimal_math::pow(a, b, ctx.precision).map(Value::Decimal))
}

pub static POW: Operator = Operator {
    name: "^",
    verb: "raise",
    expr_op: ExprOp::Pow,
    integer: Some(int_pow),
    bignum: Some(bignum_pow),
    fraction: Some(fraction_pow),
    decimal: Some(decimal_pow),
    complex: Some(complex_ops::pow),
    non_numeric: SYMBOLIC,
    composite: None,
    zero_divisor: false,
    allows_complex: true,
};

// Hypot

fn int_hypot(a: i64, b: i64) -> Option<i64> {
    let sum = a.checked_mul(a)?.checked_add(b.checked_mul(b)?)?;
    let root = sum.sqrt();
    (root * root == sum).then_some(root)
}

fn bignum_hypot(a: &BigInt, b: &BigInt, _: &EvalContext<'_>) -> Result<Option<Value>> {
    let sum = a * a + b * b;
    let root = sum.sqrt();
    if &root * &root == sum {
        big(root)
    } else {
        Ok(None)
    }
}

pub(crate) fn decimal_hypot(a: &Decimal, b: &Decimal, precision: usize) -> Decimal {
    let wp = precision + 5;
    let sum = a.mul(a, wp).add(&b.mul(b, wp), wp);
    decimal_math::sqrt(&sum, wp)
        .unwrap_or_else(Decimal::zero)
        .round(precision)
}

pub static HYPOT: Operator = Operator {
    name: "HYPOT",
    verb: "take the hypotenuse of",
    expr_op: ExprOp::Hypot,
    integer: Some(int_hypot),
    bignum: Some(bignum_hypot),
    fraction: None,
    decimal: Some(|a, b, ctx| dec(decimal_hypot(a, b, ctx.precision))),
    complex: None,
    non_numeric: SYMBOLIC,
    composite: None,
    zero_divisor: false,
    allows_complex: false,
};

// Atan2

/// Converts an angle in radians to the configured angle mode.
pub(crate) fn from_radians(angle: Decimal, ctx: &EvalContext<'_>) -> Decimal {
    let half_turn = match ctx.angle_mode {
        AngleMode::Radians => return angle,
        AngleMode::Degrees => 180,
        AngleMode::Grads => 200,
    };
    let wp = ctx.precision + 5;
    angle
        .mul(&Decimal::from_i64(half_turn), wp)
        .div(&decimal_math::pi(wp), wp)
        .unwrap_or_else(Decimal::zero)
        .round(ctx.precision)
}

fn decimal_atan2(a: &Decimal, b: &Decimal, ctx: &EvalContext<'_>) -> Result<Option<Value>> {
    let wp = ctx.precision + 5;
    let angle = decimal_math::atan2(a, b, wp);
    dec(from_radians(angle, ctx).round(ctx.precision))
}

pub static ATAN2: Operator = Operator {
    name: "ATAN2",
    verb: "take the angle of",
    expr_op: ExprOp::Atan2,
    integer: None,
    bignum: None,
    fraction: None,
    decimal: Some(decimal_atan2),
    complex: None,
    non_numeric: SYMBOLIC,
    composite: None,
    zero_divisor: false,
    allows_complex: false,
};

// Min and max

pub static MIN: Operator = Operator {
    name: "MIN",
    verb: "take the minimum of",
    expr_op: ExprOp::Min,
    integer: Some(|a, b| Some(a.min(b))),
    bignum: Some(|a, b, _| big(a.min(b).clone())),
    fraction: Some(|a, b, _| frac(a.min(b).clone())),
    decimal: Some(|a, b, _| dec(a.min(b).clone())),
    complex: None,
    non_numeric: SYMBOLIC,
    composite: None,
    zero_divisor: false,
    allows_complex: false,
};

pub static MAX: Operator = Operator {
    name: "MAX",
    verb: "take the maximum of",
    expr_op: ExprOp::Max,
    integer: Some(|a, b| Some(a.max(b))),
    bignum: Some(|a, b, _| big(a.max(b).clone())),
    fraction: Some(|a, b, _| frac(a.max(b).clone())),
    decimal: Some(|a, b, _| dec(a.max(b).clone())),
    complex: None,
    non_numeric: SYMBOLIC,
    composite: None,
    zero_divisor: false,
    allows_complex: false,
};

// Percent family

const fn composite(
    name: &'static str,
    verb: &'static str,
    expr_op: ExprOp,
    definition: fn(&Value, &Value, &EvalContext<'_>) -> Result<Value>,
) -> Operator {
    Operator {
        name,
        verb,
        expr_op,
        integer: None,
        bignum: None,
        fraction: None,
        decimal: None,
        complex: None,
        non_numeric: SYMBOLIC,
        composite: Some(definition),
        zero_divisor: false,
        allows_complex: false,
    }
}

pub static PERCENT: Operator = composite("%", "take the percentage of", ExprOp::Percent, percent::percent);

pub static PERCENT_CHANGE: Operator = composite(
    "%CH",
    "take the percent change of",
    ExprOp::PercentChange,
    percent::percent_change,
);

pub static PERCENT_TOTAL: Operator = composite(
    "%T",
    "take the percent total of",
    ExprOp::PercentTotal,
    percent::percent_total,
);

/// Every binary operator, in expression-operator order.
pub static OPERATORS: &[&Operator] = &[
    &ADD,
    &SUB,
    &MUL,
    &DIV,
    &POW,
    &MOD,
    &REM,
    &HYPOT,
    &ATAN2,
    &MIN,
    &MAX,
    &PERCENT,
    &PERCENT_CHANGE,
    &PERCENT_TOTAL,
];

pub fn operator_for(op: ExprOp) -> &'static Operator {
    match op {
        ExprOp::Add => &ADD,
        ExprOp::Sub => &SUB,
        ExprOp::Mul => &MUL,
        ExprOp::Div => &DIV,
        ExprOp::Pow => &POW,
        ExprOp::Mod => &MOD,
        ExprOp::Rem => &REM,
        ExprOp::Hypot => &HYPOT,
        ExprOp::Atan2 => &ATAN2,
        ExprOp::Min => &MIN,
        ExprOp::Max => &MAX,
        ExprOp::Percent => &PERCENT,
        ExprOp::PercentChange => &PERCENT_CHANGE,
        ExprOp::PercentTotal => &PERCENT_TOTAL,
    }
}

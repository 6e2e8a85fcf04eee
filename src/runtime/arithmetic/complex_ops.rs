//! Complex-level implementations.
//!
//! Parts are combined with the real operators, so complex numbers with exact
//! parts give exact results; only powers with non-integer exponents go
//! through polar form in decimal.

use num_traits::{Signed, ToPrimitive};

use crate::runtime::{
    arithmetic::{
        EvalContext, Operator,
        evaluate::numeric,
        operators::{ADD, DIV, HYPOT, MUL, SUB, decimal_hypot},
    },
    error::{Result, RuntimeError},
    tower::{Complex, Decimal, Value, decimal_math},
};

/// Largest integer exponent computed by repeated complex multiplication.
const MAX_EXACT_EXPONENT: u64 = 1024;

fn part(op: &Operator, a: &Value, b: &Value, ctx: &EvalContext<'_>) -> Result<Value> {
    numeric(op, a, b, ctx)
}

fn complex(re: Value, im: Value) -> Result<Option<Value>> {
    Ok(Some(Value::complex(re, im)))
}

pub fn add(x: &Complex, y: &Complex, ctx: &EvalContext<'_>) -> Result<Option<Value>> {
    complex(part(&ADD, &x.re, &y.re, ctx)?, part(&ADD, &x.im, &y.im, ctx)?)
}

pub fn sub(x: &Complex, y: &Complex, ctx: &EvalContext<'_>) -> Result<Option<Value>> {
    complex(part(&SUB, &x.re, &y.re, ctx)?, part(&SUB, &x.im, &y.im, ctx)?)
}

fn product(x: &Complex, y: &Complex, ctx: &EvalContext<'_>) -> Result<Complex> {
    let ac = part(&MUL, &x.re, &y.re, ctx)?;
    let bd = part(&MUL, &x.im, &y.im, ctx)?;
    let ad = part(&MUL, &x.re, &y.im, ctx)?;
    let bc = part(&MUL, &x.im, &y.re, ctx)?;
    Ok(Complex::new(
        part(&SUB, &ac, &bd, ctx)?,
        part(&ADD, &ad, &bc, ctx)?,
    ))
}

pub fn mul(x: &Complex, y: &Complex, ctx: &EvalContext<'_>) -> Result<Option<Value>> {
    Ok(Some(Value::Complex(Box::new(product(x, y, ctx)?))))
}

fn quotient(x: &Complex, y: &Complex, ctx: &EvalContext<'_>) -> Result<Complex> {
    if y.is_zero() {
        return Err(RuntimeError::DivisionByZero);
    }
    let conjugate = Complex::new(y.re.clone(), part(&SUB, &Value::Integer(0), &y.im, ctx)?);
    let numerator = product(x, &conjugate, ctx)?;
    let norm = part(
        &ADD,
        &part(&MUL, &y.re, &y.re, ctx)?,
        &part(&MUL, &y.im, &y.im, ctx)?,
        ctx,
    )?;
    Ok(Complex::new(
        part(&DIV, &numerator.re, &norm, ctx)?,
        part(&DIV, &numerator.im, &norm, ctx)?,
    ))
}

pub fn div(x: &Complex, y: &Complex, ctx: &EvalContext<'_>) -> Result<Option<Value>> {
    Ok(Some(Value::Complex(Box::new(quotient(x, y, ctx)?))))
}

fn to_decimal(value: &Value, precision: usize) -> Decimal {
    value.to_decimal(precision).unwrap_or_else(Decimal::zero)
}

pub fn pow(x: &Complex, y: &Complex, ctx: &EvalContext<'_>) -> Result<Option<Value>> {
    if y.im.is_zero() {
        let exponent = match &y.re {
            Value::Integer(n) => Some(num_bigint::BigInt::from(*n)),
            Value::Bignum(n) => Some(n.clone()),
            _ => None,
        };
        if let Some(n) = exponent.filter(|n| n.abs().to_u64().is_some_and(|m| m <= MAX_EXACT_EXPONENT)) {
            let mut acc = Complex::from_real(Value::Integer(1));
            let mut base = x.clone();
            let mut remaining = n.abs().to_u64().unwrap_or(0);
            while remaining > 0 {
                if remaining & 1 == 1 {
                    acc = product(&acc, &base, ctx)?;
                }
                remaining >>= 1;
                if remaining > 0 {
                    base = product(&base, &base, ctx)?;
                }
            }
            if n.is_negative() {
                acc = quotient(&Complex::from_real(Value::Integer(1)), &acc, ctx)?;
            }
            return Ok(Some(Value::Complex(Box::new(acc))));
        }
    }
    if x.is_zero() {
        return if y.re.is_negative() || y.re.is_zero() {
            Err(RuntimeError::DivisionByZero)
        } else {
            complex(Value::Integer(0), Value::Integer(0))
        };
    }

    // z^w = exp(w ln z), ln z = ln|z| + i arg z
    let wp = ctx.precision + 10;
    let (a, b) = (to_decimal(&x.re, wp), to_decimal(&x.im, wp));
    let (c, d) = (to_decimal(&y.re, wp), to_decimal(&y.im, wp));
    let modulus = decimal_hypot(&a, &b, wp);
    let ln_r = decimal_math::ln(&modulus, wp).unwrap_or_else(Decimal::zero);
    let theta = decimal_math::atan2(&b, &a, wp);
    let re = c.mul(&ln_r, wp).sub(&d.mul(&theta, wp), wp);
    let im = c.mul(&theta, wp).add(&d.mul(&ln_r, wp), wp);
    let scale = decimal_math::exp(&re, wp);
    let (sin, cos) = decimal_math::sin_cos(&im, wp).ok_or_else(|| {
        RuntimeError::BadArgumentValue("angle too large for trigonometric reduction".into())
    })?;
    complex(
        Value::Decimal(scale.mul(&cos, wp).round(ctx.precision)),
        Value::Decimal(scale.mul(&sin, wp).round(ctx.precision)),
    )
}

/// `|z|`, exact when the parts form a Pythagorean triple.
pub fn modulus(z: &Complex, ctx: &EvalContext<'_>) -> Result<Value> {
    numeric(&HYPOT, &z.re, &z.im, ctx)
}

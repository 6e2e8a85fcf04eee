//! Binary operators on unit objects.
//!
//! Additive operators convert the second operand into the first one's unit,
//! multiplicative ones combine the unit expressions. The numeric parts go
//! back through the generic evaluator.

use crate::{
    runtime::{
        arithmetic::{self, EvalContext, Operator, evaluate::bad_type, operators::MUL},
        error::{Result, RuntimeError},
        expr::{Expr, ExprOp},
        tower::Value,
        units::{
            UnitValue,
            reduce::{convert, reduce, simplify},
        },
    },
    syntax::render_unit,
};

/// Views a number as a dimensionless unit object.
fn as_unit(value: &Value) -> Option<UnitValue> {
    match value {
        Value::Unit(u) => Some((**u).clone()),
        number if number.level().is_some() => {
            Some(UnitValue::new(number.clone(), Expr::Number(Value::Integer(1))))
        }
        _ => None,
    }
}

pub fn evaluate(op: &Operator, x: &Value, y: &Value, ctx: &EvalContext<'_>) -> Result<Value> {
    match op.expr_op {
        ExprOp::Mul | ExprOp::Div => combine(op, x, y, ctx),
        ExprOp::Pow => power(op, x, y, ctx),
        ExprOp::Atan2 => {
            let (a, b, _) = align(op, x, y, ctx)?;
            arithmetic::evaluate(op, &a, &b, ctx)
        }
        _ => {
            let (a, b, unit) = align(op, x, y, ctx)?;
            let value = arithmetic::evaluate(op, &a, &b, ctx)?;
            Ok(Value::unit(value, unit))
        }
    }
}

/// Numeric parts of `x` and `y` in `x`'s unit.
fn align(op: &Operator, x: &Value, y: &Value, ctx: &EvalContext<'_>) -> Result<(Value, Value, Expr)> {
    let (Some(a), Some(b)) = (as_unit(x), as_unit(y)) else {
        return Err(bad_type(op, x, y));
    };
    match convert(&b, &a.unit, ctx)? {
        Some(converted) => Ok((a.value, converted.value, a.unit)),
        None => Err(RuntimeError::IncompatibleUnits {
            from: render_unit(&b.unit),
            to: render_unit(&a.unit),
        }),
    }
}

fn combine(op: &Operator, x: &Value, y: &Value, ctx: &EvalContext<'_>) -> Result<Value> {
    let (Some(a), Some(b)) = (as_unit(x), as_unit(y)) else {
        return Err(bad_type(op, x, y));
    };
    let value = arithmetic::evaluate(op, &a.value, &b.value, ctx)?;
    let unit = simplify(&Expr::binary(op.expr_op, a.unit, b.unit));
    finish(value, unit, ctx)
}

fn power(op: &Operator, x: &Value, y: &Value, ctx: &EvalContext<'_>) -> Result<Value> {
    let exponent = match (x, y) {
        (Value::Unit(_), Value::Integer(_) | Value::Bignum(_) | Value::Fraction(_)) => {
            y.to_fraction()
        }
        (Value::Unit(_), Value::Decimal(d)) if d.is_integer() => Some(d.to_fraction()),
        _ => None,
    };
    let (Some(exponent), Value::Unit(u)) = (exponent, x) else {
        return Err(bad_type(op, x, y));
    };
    let exponent = Value::from_fraction(exponent);
    let value = arithmetic::evaluate(op, &u.value, &exponent, ctx)?;
    let unit = simplify(&Expr::binary(ExprOp::Pow, u.unit.clone(), Expr::Number(exponent)));
    finish(value, unit, ctx)
}

/// Wraps a combined result, folding dimensionless units into the number.
fn finish(value: Value, unit: Expr, ctx: &EvalContext<'_>) -> Result<Value> {
    let reduced = reduce(&unit, ctx)?;
    if reduced.dims.is_empty() {
        return arithmetic::evaluate(&MUL, &value, &reduced.factor, ctx);
    }
    Ok(Value::unit(value, unit))
}

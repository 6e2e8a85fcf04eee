use log::trace;

use crate::runtime::{
    arithmetic::{
        EvalContext,
        operator::Operator,
        promotion::{Promoted, common_level, promote},
    },
    error::{Result, RuntimeError},
    expr::Expr,
    gc::{GcHeap, Handle},
    tower::{Level, Value},
    units::unit_ops,
};

pub(crate) fn bad_type(op: &Operator, x: &Value, y: &Value) -> RuntimeError {
    RuntimeError::BadArgumentType {
        op: op.verb,
        left: x.type_name(),
        right: y.type_name(),
    }
}

/// Applies a binary operator to two values.
///
/// Symbolic operands build an expression, composite operators delegate to
/// their definition, units go through the unit subsystem and everything else
/// is dispatched on the numeric tower. Operand order is never swapped.
pub fn evaluate(op: &Operator, x: &Value, y: &Value, ctx: &EvalContext<'_>) -> Result<Value> {
    if x.is_symbolic() || y.is_symbolic() {
        return match op.non_numeric {
            Some(fallback) => fallback(op, x, y, ctx),
            None => Err(bad_type(op, x, y)),
        };
    }
    if let Some(composite) = op.composite {
        return composite(x, y, ctx);
    }
    if matches!(x, Value::Unit(_)) || matches!(y, Value::Unit(_)) {
        return unit_ops::evaluate(op, x, y, ctx);
    }
    numeric(op, x, y, ctx)
}

/// Dispatches on the numeric tower.
///
/// Starts at the lowest level holding both operands and walks up until an
/// implementation produces a result. The fraction level is skipped when
/// exact division is off and neither operand is already a fraction; the
/// complex level is only entered for complex operands or operators that
/// allow it.
pub(crate) fn numeric(
    op: &Operator,
    x: &Value,
    y: &Value,
    ctx: &EvalContext<'_>,
) -> Result<Value> {
    let Some(start) = common_level(x, y) else {
        return Err(bad_type(op, x, y));
    };
    for level in Level::ALL.into_iter().filter(|level| *level >= start) {
        if level == Level::Fraction && start < Level::Fraction && !ctx.exact_division {
            continue;
        }
        if level == Level::Complex && start < Level::Complex && !op.allows_complex {
            break;
        }
        if !op.implements(level) {
            continue;
        }
        let Some(promoted) = promote(x, y, level, ctx.precision) else {
            continue;
        };
        if op.zero_divisor && promoted.divisor_is_zero() {
            return Err(RuntimeError::DivisionByZero);
        }
        match dispatch(op, &promoted, ctx)? {
            Some(result) => return check_limits(result, ctx),
            None => trace!("{}: escalating past {}", op.name, level.name()),
        }
    }
    Err(bad_type(op, x, y))
}

fn dispatch(op: &Operator, promoted: &Promoted, ctx: &EvalContext<'_>) -> Result<Option<Value>> {
    match promoted {
        Promoted::Integer(a, b) => Ok(op.integer.and_then(|f| f(*a, *b)).map(Value::Integer)),
        Promoted::Bignum(a, b) => op.bignum.map_or(Ok(None), |f| f(a, b, ctx)),
        Promoted::Fraction(a, b) => op.fraction.map_or(Ok(None), |f| f(a, b, ctx)),
        Promoted::Decimal(a, b) => op.decimal.map_or(Ok(None), |f| f(a, b, ctx)),
        Promoted::Complex(a, b) => op.complex.map_or(Ok(None), |f| f(a, b, ctx)),
    }
}

/// Rejects results outside the configured representation limits.
pub fn check_limits(value: Value, ctx: &EvalContext<'_>) -> Result<Value> {
    match value {
        Value::Bignum(ref v) if v.bits() > ctx.max_bignum_bits => Err(RuntimeError::Overflow {
            representation: "Big integer",
        }),
        Value::Fraction(ref f) if f.bits() > ctx.max_bignum_bits => Err(RuntimeError::Overflow {
            representation: "Fraction",
        }),
        Value::Decimal(d) => Ok(Value::Decimal(d.check_range(ctx.max_exponent)?)),
        Value::Complex(z) => {
            let re = check_limits(z.re, ctx)?;
            let im = check_limits(z.im, ctx)?;
            Ok(Value::complex(re, im))
        }
        Value::Unit(mut u) => {
            u.value = check_limits(u.value, ctx)?;
            Ok(Value::Unit(u))
        }
        other => Ok(other),
    }
}

/// Default non-numeric fallback: builds the expression `x op y`.
pub fn symbolic(op: &Operator, x: &Value, y: &Value, _ctx: &EvalContext<'_>) -> Result<Value> {
    match (Expr::from_value(x), Expr::from_value(y)) {
        (Some(left), Some(right)) => Ok(Value::Expression(Box::new(Expr::binary(
            op.expr_op, left, right,
        )))),
        _ => Err(bad_type(op, x, y)),
    }
}

/// Handle-level entry point used by commands: loads both operands, evaluates
/// and stores the result.
///
/// Nothing is allocated unless evaluation succeeds.
pub fn evaluate_handles(
    heap: &mut GcHeap,
    op: &Operator,
    x: &Handle,
    y: &Handle,
    ctx: &EvalContext<'_>,
) -> Result<Handle> {
    let (x, y) = (heap.load(x), heap.load(y));
    let result = evaluate(op, &x, &y, ctx)?;
    heap.store(&result)
}

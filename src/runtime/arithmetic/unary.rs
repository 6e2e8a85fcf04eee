use num_bigint::BigInt;

use crate::runtime::{
    arithmetic::{
        EvalContext, check_limits, complex_ops, evaluate,
        operators::{DIV, POW},
    },
    error::{Result, RuntimeError},
    expr::Expr,
    tower::{Complex, Fraction, Value, decimal_math},
};

/// One-operand arithmetic commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Inv,
    Abs,
    Sqrt,
}

impl UnaryOp {
    pub const ALL: [UnaryOp; 4] = [UnaryOp::Neg, UnaryOp::Inv, UnaryOp::Abs, UnaryOp::Sqrt];

    /// Command spelling.
    pub const fn name(self) -> &'static str {
        match self {
            UnaryOp::Neg => "NEG",
            UnaryOp::Inv => "INV",
            UnaryOp::Abs => "ABS",
            UnaryOp::Sqrt => "SQRT",
        }
    }

    fn verb(self) -> &'static str {
        match self {
            UnaryOp::Neg => "negate",
            UnaryOp::Inv => "invert",
            UnaryOp::Abs => "take the absolute value of",
            UnaryOp::Sqrt => "take the square root of",
        }
    }

    fn bad_type(self, x: &Value) -> RuntimeError {
        RuntimeError::BadOperandType {
            op: self.verb(),
            operand: x.type_name(),
        }
    }

    pub fn apply(self, x: &Value, ctx: &EvalContext<'_>) -> Result<Value> {
        match self {
            UnaryOp::Neg => negate(x).ok_or_else(|| self.bad_type(x)),
            UnaryOp::Inv => evaluate(&DIV, &Value::Integer(1), x, ctx),
            UnaryOp::Abs => abs(self, x, ctx),
            UnaryOp::Sqrt => sqrt(self, x, ctx),
        }
    }
}

/// Exact negation; `None` for values that have no negative.
pub fn negate(x: &Value) -> Option<Value> {
    Some(match x {
        Value::Integer(v) => match v.checked_neg() {
            Some(n) => Value::Integer(n),
            None => Value::from_bigint(-BigInt::from(*v)),
        },
        Value::Bignum(v) => Value::from_bigint(-v),
        Value::Fraction(f) => Value::Fraction(f.neg()),
        Value::Decimal(d) => Value::Decimal(d.neg()),
        Value::Complex(z) => Value::complex(negate(&z.re)?, negate(&z.im)?),
        Value::Unit(u) => Value::unit(negate(&u.value)?, u.unit.clone()),
        Value::Symbol(_) | Value::Expression(_) => {
            Value::Expression(Box::new(Expr::neg(Expr::from_value(x)?)))
        }
        Value::Program(_) | Value::Command(_) => return None,
    })
}

fn abs(op: UnaryOp, x: &Value, ctx: &EvalContext<'_>) -> Result<Value> {
    match x {
        Value::Complex(z) => complex_ops::modulus(z, ctx),
        Value::Unit(u) => Ok(Value::unit(abs(op, &u.value, ctx)?, u.unit.clone())),
        real if real.is_real() => {
            if real.is_negative() {
                negate(real).ok_or_else(|| op.bad_type(x))
            } else {
                Ok(real.clone())
            }
        }
        _ => Err(op.bad_type(x)),
    }
}

fn exact_root(value: &BigInt) -> Option<BigInt> {
    let root = value.sqrt();
    (&root * &root == *value).then_some(root)
}

fn sqrt(op: UnaryOp, x: &Value, ctx: &EvalContext<'_>) -> Result<Value> {
    match x {
        Value::Complex(_) | Value::Unit(_) | Value::Symbol(_) | Value::Expression(_) => {
            evaluate(&POW, x, &Value::from_ratio(1.into(), 2.into()), ctx)
        }
        real if real.is_real() && real.is_negative() => {
            let magnitude = negate(real).ok_or_else(|| op.bad_type(x))?;
            let root = sqrt(op, &magnitude, ctx)?;
            Ok(Value::Complex(Box::new(Complex::new(Value::Integer(0), root))))
        }
        Value::Integer(_) | Value::Bignum(_) => {
            let n = x.to_bigint().ok_or_else(|| op.bad_type(x))?;
            match exact_root(&n) {
                Some(root) => Ok(Value::from_bigint(root)),
                None => decimal_sqrt(x, ctx),
            }
        }
        Value::Fraction(f) => match (exact_root(f.numer()), exact_root(f.denom())) {
            (Some(num), Some(den)) => Ok(Value::from_fraction(Fraction::new(num, den))),
            _ => decimal_sqrt(x, ctx),
        },
        Value::Decimal(_) => decimal_sqrt(x, ctx),
        _ => Err(op.bad_type(x)),
    }
}

fn decimal_sqrt(x: &Value, ctx: &EvalContext<'_>) -> Result<Value> {
    let wp = ctx.precision + 2;
    let root = x
        .to_decimal(wp)
        .and_then(|d| decimal_math::sqrt(&d.abs(), wp))
        .ok_or_else(|| UnaryOp::Sqrt.bad_type(x))?;
    check_limits(Value::Decimal(root.round(ctx.precision)), ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{config::RuntimeConfig, tower::Decimal, units::UnitTable};

    fn with_ctx<T>(f: impl FnOnce(&EvalContext<'_>) -> T) -> T {
        let units = UnitTable::builtin();
        let ctx = EvalContext::new(&RuntimeConfig::default(), &units);
        f(&ctx)
    }

    #[test]
    fn negating_the_smallest_integer_promotes() {
        let result = negate(&Value::Integer(i64::MIN)).unwrap();
        assert_eq!(result, Value::Bignum(-BigInt::from(i64::MIN)));
    }

    #[test]
    fn inverse_of_an_integer_is_a_fraction() {
        with_ctx(|ctx| {
            assert_eq!(
                UnaryOp::Inv.apply(&Value::Integer(4), ctx).unwrap(),
                Value::from_ratio(1.into(), 4.into())
            );
            assert_eq!(
                UnaryOp::Inv.apply(&Value::Integer(0), ctx),
                Err(RuntimeError::DivisionByZero)
            );
        });
    }

    #[test]
    fn perfect_squares_have_exact_roots() {
        with_ctx(|ctx| {
            assert_eq!(UnaryOp::Sqrt.apply(&Value::Integer(144), ctx).unwrap(), Value::Integer(12));
            assert_eq!(
                UnaryOp::Sqrt
                    .apply(&Value::from_ratio(9.into(), 16.into()), ctx)
                    .unwrap(),
                Value::from_ratio(3.into(), 4.into())
            );
        });
    }

    #[test]
    fn square_root_of_two_is_decimal() {
        with_ctx(|ctx| {
            let Value::Decimal(root) = UnaryOp::Sqrt.apply(&Value::Integer(2), ctx).unwrap() else {
                panic!("expected a decimal");
            };
            assert_eq!(root.digit_string(), "141421356237309504880169");
        });
    }

    #[test]
    fn square_root_of_a_negative_is_imaginary() {
        with_ctx(|ctx| {
            assert_eq!(
                UnaryOp::Sqrt.apply(&Value::Integer(-9), ctx).unwrap(),
                Value::complex(Value::Integer(0), Value::Integer(3))
            );
        });
    }

    #[test]
    fn absolute_value_of_complex_is_its_modulus() {
        with_ctx(|ctx| {
            let z = Value::complex(Value::Integer(3), Value::Integer(-4));
            assert_eq!(UnaryOp::Abs.apply(&z, ctx).unwrap(), Value::Integer(5));
            let d = Value::Decimal(Decimal::new((-25).into(), -1));
            assert_eq!(
                UnaryOp::Abs.apply(&d, ctx).unwrap(),
                Value::Decimal(Decimal::new(25.into(), -1))
            );
        });
    }

    #[test]
    fn programs_have_no_negative() {
        with_ctx(|ctx| {
            let err = UnaryOp::Neg.apply(&Value::Program(vec![]), ctx).unwrap_err();
            assert_eq!(err.code().code, "E1013");
        });
    }
}

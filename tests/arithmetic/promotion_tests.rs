use num_bigint::BigInt;
use rplcore::runtime::{
    RuntimeConfig,
    arithmetic::{EvalContext, OPERATORS, Promoted, common_level, evaluate, operators::*, promote},
    tower::{Decimal, Level, Value},
    units::UnitTable,
};

fn with_ctx<T>(f: impl FnOnce(&EvalContext<'_>) -> T) -> T {
    let units = UnitTable::builtin();
    let ctx = EvalContext::new(&RuntimeConfig::default(), &units);
    f(&ctx)
}

fn ratio(n: i64, d: i64) -> Value {
    Value::from_ratio(n.into(), d.into())
}

fn decimal(mantissa: i64, exponent: i64) -> Value {
    Value::Decimal(Decimal::new(mantissa.into(), exponent))
}

#[test]
fn levels_order_the_tower() {
    assert_eq!(Value::Integer(1).level(), Some(Level::Integer));
    assert_eq!(Value::Bignum(BigInt::from(1u128 << 70)).level(), Some(Level::Bignum));
    assert_eq!(ratio(1, 2).level(), Some(Level::Fraction));
    assert_eq!(decimal(5, -1).level(), Some(Level::Decimal));
    assert_eq!(Value::complex(1.into(), 1.into()).level(), Some(Level::Complex));
    assert_eq!(Value::Symbol("x".into()).level(), None);
}

#[test]
fn common_level_picks_the_higher_operand() {
    assert_eq!(common_level(&ratio(1, 2), &Value::Integer(3)), Some(Level::Fraction));
    assert_eq!(common_level(&decimal(1, 0), &ratio(1, 2)), Some(Level::Decimal));
    assert_eq!(common_level(&Value::Program(vec![]), &Value::Integer(3)), None);
}

#[test]
fn promotion_is_exact_below_decimal() {
    let big = Value::Bignum(BigInt::from(1u128 << 80));
    let Some(Promoted::Fraction(a, b)) = promote(&Value::Integer(3), &big, Level::Fraction, 24)
    else {
        panic!("expected fractions");
    };
    assert!(a.is_integer() && b.is_integer());
    assert_eq!(a.numer(), &BigInt::from(3));
    assert_eq!(b.numer(), &BigInt::from(1u128 << 80));
}

#[test]
fn results_demote_to_the_smallest_exact_form() {
    with_ctx(|ctx| {
        assert_eq!(evaluate(&ADD, &ratio(1, 2), &ratio(1, 2), ctx).unwrap(), Value::Integer(1));
        let big = Value::Bignum(BigInt::from(i64::MAX) + 10);
        assert_eq!(evaluate(&SUB, &big, &big, ctx).unwrap(), Value::Integer(0));
        let z = Value::complex(1.into(), 2.into());
        let conj = Value::complex(1.into(), (-2).into());
        assert_eq!(evaluate(&MUL, &z, &conj, ctx).unwrap(), Value::complex(5.into(), 0.into()));
    });
}

#[test]
fn integer_overflow_walks_up_one_level() {
    with_ctx(|ctx| {
        let product = evaluate(&MUL, &Value::Integer(i64::MAX), &Value::Integer(2), ctx).unwrap();
        assert_eq!(product, Value::Bignum(BigInt::from(i64::MAX) * 2));
        let min = evaluate(&SUB, &Value::Integer(i64::MIN), &Value::Integer(1), ctx).unwrap();
        assert_eq!(min, Value::Bignum(BigInt::from(i64::MIN) - 1));
    });
}

#[test]
fn mixed_fraction_and_decimal_is_decimal() {
    with_ctx(|ctx| {
        assert_eq!(evaluate(&MUL, &ratio(1, 4), &decimal(2, 0), ctx).unwrap(), decimal(5, -1));
        assert_eq!(evaluate(&ADD, &Value::Integer(1), &decimal(5, -1), ctx).unwrap(), decimal(15, -1));
    });
}

#[test]
fn real_and_complex_mix_at_the_complex_level() {
    with_ctx(|ctx| {
        let z = Value::complex(1.into(), 1.into());
        assert_eq!(
            evaluate(&ADD, &ratio(1, 2), &z, ctx).unwrap(),
            Value::complex(ratio(3, 2), 1.into())
        );
    });
}

#[test]
fn every_operator_rejects_non_numbers() {
    with_ctx(|ctx| {
        let program = Value::Program(vec![]);
        for op in OPERATORS {
            assert!(evaluate(op, &program, &Value::Integer(1), ctx).is_err(), "{}", op.name);
        }
    });
}

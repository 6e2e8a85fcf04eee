use num_bigint::BigInt;

use crate::runtime::{
    arithmetic::{EvalContext, Operator, evaluate, evaluate_handles, operators::*},
    config::{AngleMode, RuntimeConfig},
    error::RuntimeError,
    expr::{Expr, ExprOp},
    gc::GcHeap,
    tower::{Decimal, Value},
    units::UnitTable,
};

fn eval_with(config: &RuntimeConfig, op: &Operator, x: Value, y: Value) -> Result<Value, RuntimeError> {
    let units = UnitTable::builtin();
    let ctx = EvalContext::new(config, &units);
    evaluate(op, &x, &y, &ctx)
}

fn eval(op: &Operator, x: Value, y: Value) -> Result<Value, RuntimeError> {
    eval_with(&RuntimeConfig::default(), op, x, y)
}

fn ratio(n: i64, d: i64) -> Value {
    Value::from_ratio(n.into(), d.into())
}

fn decimal(mantissa: i64, exponent: i64) -> Value {
    Value::Decimal(Decimal::new(mantissa.into(), exponent))
}

#[test]
fn add_small_integers() {
    assert_eq!(eval(&ADD, 1.into(), 2.into()).unwrap(), Value::Integer(3));
}

#[test]
fn add_overflow_promotes_to_bignum() {
    let result = eval(&ADD, Value::Integer(i64::MAX), 1.into()).unwrap();
    assert_eq!(result, Value::Bignum(BigInt::from(i64::MAX) + 1));
}

#[test]
fn bignum_results_that_fit_demote() {
    let big = Value::Bignum(BigInt::from(i64::MAX) + 1);
    assert_eq!(eval(&SUB, big, 1.into()).unwrap(), Value::Integer(i64::MAX));
}

#[test]
fn fractions_add_exactly() {
    assert_eq!(eval(&ADD, ratio(1, 3), ratio(1, 6)).unwrap(), ratio(1, 2));
}

#[test]
fn inexact_integer_division_gives_a_fraction() {
    assert_eq!(eval(&DIV, 7.into(), 2.into()).unwrap(), ratio(7, 2));
    assert_eq!(eval(&DIV, 6.into(), 3.into()).unwrap(), Value::Integer(2));
}

#[test]
fn inexact_division_gives_a_decimal_without_exact_mode() {
    let config = RuntimeConfig {
        exact_division: false,
        ..RuntimeConfig::default()
    };
    assert_eq!(eval_with(&config, &DIV, 7.into(), 2.into()).unwrap(), decimal(35, -1));
}

#[test]
fn division_by_integer_zero_fails() {
    assert_eq!(eval(&DIV, 1.into(), 0.into()), Err(RuntimeError::DivisionByZero));
    assert_eq!(eval(&DIV, ratio(1, 2), 0.into()), Err(RuntimeError::DivisionByZero));
    assert_eq!(eval(&MOD, 5.into(), 0.into()), Err(RuntimeError::DivisionByZero));
}

#[test]
fn decimal_wins_over_fraction() {
    assert_eq!(eval(&ADD, ratio(1, 2), decimal(25, -2)).unwrap(), decimal(75, -2));
}

#[test]
fn negative_integer_powers_are_fractions() {
    assert_eq!(eval(&POW, 2.into(), (-1).into()).unwrap(), ratio(1, 2));
    assert_eq!(eval(&POW, ratio(2, 3), 2.into()).unwrap(), ratio(4, 9));
    assert_eq!(eval(&POW, 0.into(), (-1).into()), Err(RuntimeError::DivisionByZero));
}

#[test]
fn large_powers_become_bignums() {
    let result = eval(&POW, 2.into(), 64.into()).unwrap();
    assert_eq!(result, Value::Bignum(BigInt::from(1u128 << 64)));
}

#[test]
fn powers_beyond_the_bignum_limit_overflow() {
    let err = eval(&POW, 2.into(), 5000.into()).unwrap_err();
    assert_eq!(
        err,
        RuntimeError::Overflow {
            representation: "Big integer"
        }
    );
}

#[test]
fn fractional_power_of_a_negative_is_complex() {
    let Value::Complex(z) = eval(&POW, (-4).into(), ratio(1, 2)).unwrap() else {
        panic!("expected a complex result");
    };
    assert_eq!(z.im, decimal(2, 0));
}

#[test]
fn complex_arithmetic_stays_exact() {
    let a = Value::complex(1.into(), 2.into());
    let b = Value::complex(3.into(), (-1).into());
    assert_eq!(eval(&MUL, a.clone(), b.clone()).unwrap(), Value::complex(5.into(), 5.into()));
    assert_eq!(eval(&DIV, a, b).unwrap(), Value::complex(ratio(1, 10), ratio(7, 10)));
}

#[test]
fn complex_integer_power_uses_repeated_products() {
    let i = Value::complex(0.into(), 1.into());
    assert_eq!(eval(&POW, i, 2.into()).unwrap(), Value::complex((-1).into(), 0.into()));
}

#[test]
fn modulo_follows_the_divisor_sign() {
    assert_eq!(eval(&MOD, (-7).into(), 3.into()).unwrap(), Value::Integer(2));
    assert_eq!(eval(&REM, (-7).into(), 3.into()).unwrap(), Value::Integer(-1));
    assert_eq!(eval(&MOD, decimal(75, -1), 2.into()).unwrap(), decimal(15, -1));
    assert_eq!(eval(&MOD, ratio(7, 2), ratio(-1, 1)).unwrap(), ratio(-1, 2));
}

#[test]
fn hypot_is_exact_for_pythagorean_triples() {
    assert_eq!(eval(&HYPOT, 3.into(), 4.into()).unwrap(), Value::Integer(5));
    let Value::Decimal(root) = eval(&HYPOT, 1.into(), 1.into()).unwrap() else {
        panic!("expected a decimal");
    };
    assert_eq!(root.digit_string(), "141421356237309504880169");
}

#[test]
fn atan2_honors_the_angle_mode() {
    let config = RuntimeConfig {
        angle_mode: AngleMode::Degrees,
        ..RuntimeConfig::default()
    };
    assert_eq!(eval_with(&config, &ATAN2, 1.into(), 1.into()).unwrap(), decimal(45, 0));
}

#[test]
fn min_and_max_compare_across_levels() {
    assert_eq!(eval(&MIN, ratio(1, 3), decimal(3, -1)).unwrap(), decimal(3, -1));
    assert_eq!(eval(&MAX, 2.into(), ratio(5, 2)).unwrap(), ratio(5, 2));
}

#[test]
fn percent_family() {
    assert_eq!(eval(&PERCENT, 200.into(), 15.into()).unwrap(), Value::Integer(30));
    assert_eq!(eval(&PERCENT_CHANGE, 50.into(), 75.into()).unwrap(), Value::Integer(50));
    assert_eq!(eval(&PERCENT_TOTAL, 200.into(), 50.into()).unwrap(), Value::Integer(25));
}

#[test]
fn symbolic_operands_build_expressions() {
    let result = eval(&ADD, Value::Symbol("x".into()), 1.into()).unwrap();
    let expected = Expr::binary(ExprOp::Add, Expr::symbol("x"), Expr::Number(Value::Integer(1)));
    assert_eq!(result, Value::Expression(Box::new(expected)));
}

#[test]
fn programs_are_not_numbers() {
    let err = eval(&ADD, Value::Program(vec![]), 1.into()).unwrap_err();
    assert_eq!(
        err,
        RuntimeError::BadArgumentType {
            op: "add",
            left: "Program",
            right: "Integer"
        }
    );
}

#[test]
fn operand_order_is_preserved() {
    assert_eq!(eval(&SUB, 1.into(), 3.into()).unwrap(), Value::Integer(-2));
    assert_eq!(eval(&DIV, 1.into(), 3.into()).unwrap(), ratio(1, 3));
}

#[test]
fn failed_evaluation_allocates_nothing() {
    let units = UnitTable::builtin();
    let ctx = EvalContext::new(&RuntimeConfig::default(), &units);
    let mut heap = GcHeap::new();
    let x = heap.store(&Value::Integer(1)).unwrap();
    let y = heap.store(&Value::Integer(0)).unwrap();
    let allocations = heap.total_allocations();

    let err = evaluate_handles(&mut heap, &DIV, &x, &y, &ctx).unwrap_err();
    assert_eq!(err, RuntimeError::DivisionByZero);
    assert_eq!(heap.total_allocations(), allocations);

    let sum = evaluate_handles(&mut heap, &ADD, &x, &x, &ctx).unwrap();
    assert_eq!(heap.load(&sum), Value::Integer(2));
}

#[test]
fn results_do_not_depend_on_heap_layout() {
    let units = UnitTable::builtin();
    let ctx = EvalContext::new(&RuntimeConfig::default(), &units);
    let mut heap = GcHeap::new();
    let operands = || {
        vec![
            (Value::Bignum(BigInt::from(i64::MAX) * 7), Value::Integer(-3)),
            (ratio(2, 3), decimal(125, -2)),
            (decimal(1, 0), Value::Integer(3)),
            (
                Value::unit(Value::Integer(1), Expr::symbol("km")),
                Value::unit(Value::Integer(500), Expr::symbol("m")),
            ),
        ]
    };
    for op in [&ADD, &SUB, &MUL, &DIV] {
        let mut first = Vec::new();
        for (x, y) in operands() {
            let garbage = heap.store(&Value::Bignum(BigInt::from(u64::MAX) << 64)).unwrap();
            let x = heap.store(&x).unwrap();
            let y = heap.store(&y).unwrap();
            drop(garbage);
            first.push(evaluate_handles(&mut heap, op, &x, &y, &ctx).unwrap());
        }
        heap.collect();
        for ((x, y), earlier) in operands().into_iter().zip(&first) {
            let x = heap.store(&x).unwrap();
            let y = heap.store(&y).unwrap();
            let again = evaluate_handles(&mut heap, op, &x, &y, &ctx).unwrap();
            assert_eq!(heap.load(&again), heap.load(earlier), "{}", op.name);
        }
    }
}

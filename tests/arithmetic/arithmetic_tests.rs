use rplcore::runtime::{AngleMode, Runtime, RuntimeConfig, RuntimeError, tower::Value};

fn run_with(config: RuntimeConfig, line: &str) -> Result<String, RuntimeError> {
    let mut rt = Runtime::new(config)?;
    rt.execute(line)?;
    Ok(rt.level(1).map(|v| v.to_string()).unwrap_or_default())
}

fn run(line: &str) -> String {
    run_with(RuntimeConfig::default(), line).unwrap_or_else(|err| panic!("{line}: {}", err.render()))
}

fn run_error(line: &str) -> RuntimeError {
    run_with(RuntimeConfig::default(), line).unwrap_err()
}

#[test]
fn basic_operators() {
    assert_eq!(run("1 2 +"), "3");
    assert_eq!(run("1 3 -"), "-2");
    assert_eq!(run("6 7 *"), "42");
    assert_eq!(run("6 3 /"), "2");
    assert_eq!(run("7 2 /"), "7/2");
    assert_eq!(run("2 10 ^"), "1024");
    assert_eq!(run("2 -1 ^"), "1/2");
}

#[test]
fn modulo_and_remainder() {
    assert_eq!(run("-7 3 MOD"), "2");
    assert_eq!(run("-7 3 REM"), "-1");
    assert_eq!(run("7 -3 mod"), "-2");
}

#[test]
fn composite_operators() {
    assert_eq!(run("3 4 HYPOT"), "5");
    assert_eq!(run("2 5/2 MAX"), "5/2");
    assert_eq!(run("1/3 0.3 MIN"), "0.3");
    assert_eq!(run("200 15 %"), "30");
    assert_eq!(run("50 75 %CH"), "50");
    assert_eq!(run("200 50 %T"), "25");
}

#[test]
fn atan2_in_degrees() {
    let config = RuntimeConfig {
        angle_mode: AngleMode::Degrees,
        ..RuntimeConfig::default()
    };
    assert_eq!(run_with(config, "1 1 ATAN2").unwrap(), "45.");
}

#[test]
fn decimals() {
    assert_eq!(run("1.5 0.25 +"), "1.75");
    assert_eq!(run("1/2 0.25 +"), "0.75");
    assert_eq!(run("1E20 10 *"), "1.E21");
}

#[test]
fn complex_numbers() {
    assert_eq!(run("(1,2) (3,-1) *"), "(5,5)");
    assert_eq!(run("-9 SQRT"), "(0,3)");
}

#[test]
fn unary_commands() {
    assert_eq!(run("5 NEG"), "-5");
    assert_eq!(run("4 INV"), "1/4");
    assert_eq!(run("-3/4 ABS"), "3/4");
    assert_eq!(run("144 SQRT"), "12");
    assert_eq!(run("(3,4) ABS"), "5");
}

#[test]
fn symbolic_operands_build_algebraics() {
    assert_eq!(run("'x' 2 *"), "'x*2'");
    assert_eq!(run("x y + 2 ^"), "'(x+y)^2'");
    assert_eq!(run("x NEG"), "'-x'");
}

#[test]
fn inexact_division_without_exact_mode() {
    let config = RuntimeConfig {
        exact_division: false,
        ..RuntimeConfig::default()
    };
    assert_eq!(run_with(config, "7 2 /").unwrap(), "3.5");
}

#[test]
fn precision_bounds_decimal_results() {
    let mut rt = Runtime::new(RuntimeConfig::default()).unwrap();
    rt.execute("20 PREC 2 SQRT").unwrap();
    let Some(Value::Decimal(root)) = rt.level(1) else {
        panic!("expected a decimal");
    };
    assert_eq!(root.digit_string(), "14142135623730950488");
}

#[test]
fn errors() {
    assert_eq!(run_error("1 0 /"), RuntimeError::DivisionByZero);
    assert_eq!(run_error("0 INV"), RuntimeError::DivisionByZero);
    assert_eq!(
        run_error("« 1 » 2 +"),
        RuntimeError::BadArgumentType {
            op: "add",
            left: "Program",
            right: "Integer",
        }
    );
    assert!(matches!(run_error("« 1 » NEG"), RuntimeError::BadOperandType { .. }));
    assert_eq!(run_error("+"), RuntimeError::StackUnderflow { needed: 2, depth: 0 });
}

#[test]
fn bignum_limit_overflows() {
    let config = RuntimeConfig {
        max_bignum_bits: 64,
        ..RuntimeConfig::default()
    };
    let err = run_with(config, "2 100 ^").unwrap_err();
    assert!(matches!(err, RuntimeError::Overflow { .. }));
}

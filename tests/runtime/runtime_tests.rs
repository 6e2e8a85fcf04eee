use std::{env, fs, thread};

use rplcore::runtime::{
    AngleMode, Runtime, RuntimeConfig, RuntimeError,
    screen::{Comparison, ReferenceImages, Screen},
    tower::Value,
};

fn runtime() -> Runtime {
    Runtime::new(RuntimeConfig::default()).unwrap()
}

#[test]
fn config_json_fills_in_defaults() {
    let config = RuntimeConfig::from_json(r#"{ "precision": 12, "angle_mode": "degrees" }"#).unwrap();
    assert_eq!(config.precision, 12);
    assert_eq!(config.angle_mode, AngleMode::Degrees);
    assert_eq!(config.heap_bytes, RuntimeConfig::default().heap_bytes);

    let again = RuntimeConfig::from_json(&config.to_json().unwrap()).unwrap();
    assert_eq!(again, config);
}

#[test]
fn invalid_config_is_rejected() {
    let err = RuntimeConfig::from_json(r#"{ "precision": 1 }"#).unwrap_err();
    assert!(matches!(err, RuntimeError::Config(_)));
    assert!(matches!(
        RuntimeConfig::from_json("{ precision: }"),
        Err(RuntimeError::Config(_))
    ));

    let config = RuntimeConfig {
        max_exponent: 2,
        ..RuntimeConfig::default()
    };
    assert!(matches!(Runtime::new(config), Err(RuntimeError::Config(_))));
}

#[test]
fn config_file_loads_from_disk() {
    let path = env::temp_dir().join(format!("rplcore-config-{}.json", std::process::id()));
    fs::write(&path, r#"{ "exact_division": false }"#).unwrap();
    let config = RuntimeConfig::load(&path).unwrap();
    fs::remove_file(&path).unwrap();

    let mut rt = Runtime::new(config).unwrap();
    rt.execute("1 4 /").unwrap();
    assert_eq!(rt.level(1).map(|v| v.to_string()), Some("0.25".into()));
}

#[test]
fn last_error_tracks_the_latest_line() {
    let mut rt = runtime();
    assert!(rt.execute("DROP").is_err());
    assert!(matches!(rt.last_error(), Some(RuntimeError::StackUnderflow { .. })));
    rt.execute("1").unwrap();
    assert_eq!(rt.last_error(), None);
}

#[test]
fn interrupt_can_be_raised_from_another_thread() {
    let mut rt = runtime();
    let flag = rt.interrupt_handle();
    thread::spawn(move || flag.store(true, std::sync::atomic::Ordering::Relaxed))
        .join()
        .unwrap();
    assert_eq!(rt.execute("« 1 » EVAL"), Err(RuntimeError::Interrupted));
    rt.execute("EVAL").unwrap();
    assert_eq!(rt.stack_values(), vec![Value::Integer(1)]);
}

#[test]
fn commands_inside_programs_and_nested_programs() {
    let mut rt = runtime();
    rt.execute("« « 2 * » EVAL 1 + » 'F' DROP 5 SWAP EVAL").unwrap();
    assert_eq!(rt.stack_values(), vec![Value::Integer(11)]);
}

#[test]
fn precision_changes_only_between_commands() {
    let mut rt = runtime();
    rt.execute("1 3 / 0.0 +").unwrap();
    let Some(Value::Decimal(third)) = rt.level(1) else {
        panic!("expected a decimal");
    };
    assert_eq!(third.digits(), 24);

    rt.execute("DROP 6 PREC 1 3 / 0.0 +").unwrap();
    let Some(Value::Decimal(third)) = rt.level(1) else {
        panic!("expected a decimal");
    };
    assert_eq!(third.digits(), 6);
    assert_eq!(rt.precision(), 6);
}

#[test]
fn maximum_precision_results_fit_in_the_heap() {
    let mut rt = runtime();
    rt.execute("2000 PREC 2 SQRT").unwrap();
    assert!(matches!(rt.level(1), Some(Value::Decimal(_))));

    rt.execute("1 3. /").unwrap();
    let Some(Value::Decimal(third)) = rt.level(1) else {
        panic!("expected a decimal");
    };
    assert_eq!(third.digits(), 2000);
    assert_eq!(rt.depth(), 2);
}

#[test]
fn trace_mode_does_not_change_results() {
    let mut rt = runtime();
    rt.set_trace(true);
    rt.execute("2 3 ^ DEPTH").unwrap();
    assert_eq!(rt.stack_values(), vec![Value::Integer(8), Value::Integer(1)]);
}

#[test]
fn screen_reflects_the_state() {
    let mut rt = runtime();
    let blank = rt.render_screen().clone();
    rt.execute("1 2").unwrap();
    let two_levels = rt.render_screen().clone();
    assert_ne!(blank, two_levels);
    assert_eq!(rt.render_screen(), &two_levels);

    assert!(rt.execute("+ +").is_err());
    let with_error = rt.render_screen().clone();
    assert_ne!(with_error.digest(), two_levels.digest());
    assert!(with_error.diff(&two_levels) > 0);
}

#[test]
fn reference_images_persist_as_json() {
    let path = env::temp_dir().join(format!("rplcore-refs-{}.json", std::process::id()));
    let _ = fs::remove_file(&path);

    let mut rt = runtime();
    rt.execute("1 2 +").unwrap();
    let screen = rt.render_screen().clone();

    let mut refs = ReferenceImages::load(&path).unwrap();
    assert!(refs.is_empty());
    assert!(matches!(refs.check("sum", &screen), Comparison::Missing { .. }));
    refs.record("sum", &screen);
    refs.save().unwrap();

    let refs = ReferenceImages::load(&path).unwrap();
    assert_eq!(refs.len(), 1);
    assert_eq!(refs.check("sum", &screen), Comparison::Match);
    assert!(matches!(refs.check("sum", &Screen::new()), Comparison::Mismatch { .. }));
    fs::remove_file(&path).unwrap();
}

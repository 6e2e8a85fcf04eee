use std::{env, fs, path::PathBuf};

use rplcore::runtime::{Runtime, RuntimeConfig, RuntimeError, units::UnitTable};

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

fn unit_file(name: &str, contents: &str) -> PathBuf {
    let path = env::temp_dir().join(format!("rplcore-{}-{}.csv", name, std::process::id()));
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn conversions_use_exact_factors() {
    assert_eq!(run("1_ft 1_in CONVERT"), "12_in");
    assert_eq!(run("1_mi 1_ft CONVERT"), "5280_ft");
    assert_eq!(run("2_h 1_s CONVERT"), "7200_s");
    assert_eq!(run("1_lb 1_oz CONVERT"), "16_oz");
}

#[test]
fn prefixes_scale_units() {
    assert_eq!(run("1_km 1_mm CONVERT"), "1000000_mm");
    assert_eq!(run("1_kB 1_bit CONVERT"), "8000_bit");
    assert_eq!(run("250_ms 1_s CONVERT"), "1/4_s");
}

#[test]
fn arithmetic_keeps_the_first_unit() {
    assert_eq!(run("1_km 500_m +"), "3/2_km");
    assert_eq!(run("1_km 500_m -"), "1/2_km");
    assert_eq!(run("10_m 2_s /"), "5_m/s");
    assert_eq!(run("1_km 500_m /"), "2");
}

#[test]
fn base_units_and_values() {
    assert_eq!(run("36_kph UBASE"), "10_m/s");
    assert_eq!(run("5_kg UVAL"), "5");
    assert_eq!(run("1_W 1_J UFACT"), "1_J/s");
}

#[test]
fn attaching_units() {
    assert_eq!(run("2 1_ft →UNIT"), "2_ft");
    assert_eq!(run("3 1_m TOUNIT"), "3_m");
    assert_eq!(run("3_in 1_m ->UNIT"), "3_m");
}

#[test]
fn cycling_walks_the_category() {
    assert_eq!(run("1_km CYCLE"), "1000_m");
    assert_eq!(run("127_m CYCLE"), "5000_in");
}

#[test]
fn prefix_changes_keep_the_unit() {
    assert_eq!(run("1500_m 'k' →PREFIX"), "3/2_km");
    assert_eq!(run("1_km 'm' TOPREFIX"), "1000000_mm");
    assert_eq!(run("2048_B 'Ki' ->PREFIX"), "2_KiB");
    assert_eq!(run("3_mm 'c' →PREFIX"), "3/10_cm");
}

#[test]
fn prefixes_that_spell_another_unit_are_refused() {
    assert!(matches!(run_error("1_m 'm' →PREFIX"), RuntimeError::BadArgumentValue(_)));
    assert!(matches!(run_error("1_m 'q' →PREFIX"), RuntimeError::BadArgumentValue(_)));
    assert!(matches!(
        run_error("10_m 2_s / 'k' →PREFIX"),
        RuntimeError::BadArgumentValue(_)
    ));
    assert!(matches!(run_error("5 'k' →PREFIX"), RuntimeError::BadArgumentType { .. }));
}

#[test]
fn unit_mode_turns_names_into_units() {
    let config = RuntimeConfig {
        unit_mode: true,
        ..RuntimeConfig::default()
    };
    assert_eq!(run_with(config.clone(), "'3*km' EVAL").unwrap(), "3_km");
    assert_eq!(run_with(config.clone(), "'1*km+500*m' EVAL").unwrap(), "3/2_km");
    assert_eq!(run_with(config, "'2*width' EVAL").unwrap(), run("'2*width'"));
    assert_eq!(run("'3*km' EVAL"), run("'3*km'"));
}

#[test]
fn unit_mode_can_be_switched_between_commands() {
    let mut rt = Runtime::new(RuntimeConfig::default()).unwrap();
    rt.set_unit_mode(true);
    rt.execute("'2*h' EVAL 1_min CONVERT").unwrap();
    assert_eq!(rt.level(1).unwrap().to_string(), "120_min");
    rt.set_unit_mode(false);
    rt.execute("'2*h' EVAL").unwrap();
    assert!(!rt.level(1).unwrap().to_string().contains('_'));
}

#[test]
fn dimension_mismatches_fail() {
    assert_eq!(
        run_error("1_km 1_s CONVERT"),
        RuntimeError::IncompatibleUnits {
            from: "km".into(),
            to: "s".into(),
        }
    );
    assert!(matches!(run_error("1_m 1 +"), RuntimeError::IncompatibleUnits { .. }));
    assert!(matches!(run_error("5 UVAL"), RuntimeError::BadOperandType { .. }));
}

#[test]
fn unknown_units_are_rejected_when_parsed() {
    let mut rt = Runtime::new(RuntimeConfig::default()).unwrap();
    let err = rt.execute("1 2 3_parsec").unwrap_err();
    assert_eq!(err, RuntimeError::UndefinedUnit("parsec".into()));
    assert_eq!(rt.depth(), 0);
}

#[test]
fn custom_units_load_ahead_of_builtins() {
    let path = unit_file(
        "custom",
        "# custom lengths\nsmoot, m, 1.7018, Length\nthis is not a row\nft, m, 1, Length\n",
    );
    let table = UnitTable::load(&path).unwrap();
    assert_eq!(table.len(), UnitTable::builtin().len() + 2);

    let config = RuntimeConfig {
        units_file: Some(path.display().to_string()),
        ..RuntimeConfig::default()
    };
    assert_eq!(run_with(config.clone(), "1_smoot 1_cm CONVERT").unwrap(), "8509/50_cm");
    assert_eq!(run_with(config, "3_ft 1_m CONVERT").unwrap(), "3_m");
    fs::remove_file(path).unwrap();
}

#[test]
fn cyclic_definitions_are_reported() {
    let path = unit_file("cyclic", "foo, bar, 2, Odd\nbar, foo, 3, Odd\n");
    let config = RuntimeConfig {
        units_file: Some(path.display().to_string()),
        ..RuntimeConfig::default()
    };
    let err = run_with(config, "1_foo UBASE").unwrap_err();
    assert!(matches!(err, RuntimeError::InvalidUnitDefinition(_)));
    fs::remove_file(path).unwrap();
}

#[test]
fn missing_unit_file_is_an_io_error() {
    let config = RuntimeConfig {
        units_file: Some("/nonexistent/rplcore/units.csv".into()),
        ..RuntimeConfig::default()
    };
    assert!(matches!(Runtime::new(config), Err(RuntimeError::Io(_))));
}

use rplcore::runtime::{Runtime, RuntimeConfig};

/// Runs each line and records the stack after it, preceded by the rendered
/// diagnostic when the line fails.
fn transcript(lines: &[&str]) -> String {
    let mut rt = Runtime::new(RuntimeConfig::default()).unwrap();
    let mut out = Vec::new();
    for line in lines {
        out.push(format!("> {}", line));
        if let Err(err) = rt.execute(line) {
            out.push(err.render());
        }
        let values = rt.stack_values();
        let depth = values.len();
        for (i, value) in values.iter().enumerate() {
            out.push(format!("{}: {}", depth - i, value));
        }
    }
    out.join("\n")
}

#[test]
fn snapshot_arithmetic_session() {
    let out = transcript(&[
        "1 2 +",
        "1/3 1/6 +",
        "9223372036854775807 1 +",
        "7 2 MOD",
        "CLEAR 2 SQRT",
    ]);
    insta::assert_snapshot!("arithmetic_session", out);
}

#[test]
fn snapshot_error_session() {
    let out = transcript(&["1_km 2_s +", "1 0 /", "CLEAR DROP", "« 1 » 2 +"]);
    insta::assert_snapshot!("error_session", out);
}

#[test]
fn snapshot_unit_session() {
    let out = transcript(&[
        "1_km 500_m +",
        "1_m CONVERT",
        "36_kph UBASE",
        "2 *",
        "CLEAR 3_ft 1_in CONVERT UVAL",
    ]);
    insta::assert_snapshot!("unit_session", out);
}

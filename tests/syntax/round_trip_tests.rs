use rplcore::{
    runtime::{Runtime, RuntimeConfig, tower::Value},
    syntax::{format_decimal, parse_expression, parse_real, render_expr},
};

fn reparse(text: &str) {
    let parsed = parse_expression(text).unwrap_or_else(|err| panic!("{text}: {}", err.render()));
    let rendered = render_expr(&parsed);
    let again = parse_expression(&rendered)
        .unwrap_or_else(|err| panic!("{text} rendered as {rendered}: {}", err.render()));
    assert_eq!(parsed, again, "{text} rendered as {rendered}");
}

#[test]
fn algebraics_survive_render_and_parse() {
    for text in [
        "x+y*z",
        "(x+y)*z",
        "x-(y-z)",
        "x/(y*z)",
        "x^y^z",
        "(x^y)^z",
        "-x^2",
        "(-x)^2",
        "-(x+y)",
        "x^-1",
        "a mod b",
        "(a+b) rem c",
        "hypot(x,y)+1",
        "max(a,min(b,c))",
        "atan2(y,x)*2",
        "x^(1/2)",
        "1.5*x+2",
    ] {
        reparse(text);
    }
}

#[test]
fn canonical_spellings() {
    for (text, expected) in [
        ("x + y * z", "x+y*z"),
        ("(x*y)+z", "x*y+z"),
        ("x-y-z", "x-y-z"),
        ("x-(y-z)", "x-(y-z)"),
        ("x^y^z", "x^y^z"),
        ("(x^y)^z", "(x^y)^z"),
        ("(x+y)^2", "(x+y)^2"),
        ("HYPOT(a, b)", "hypot(a,b)"),
    ] {
        assert_eq!(render_expr(&parse_expression(text).unwrap()), expected, "{text}");
    }
}

#[test]
fn decimals_print_in_plain_or_scientific_form() {
    for (text, expected) in [
        ("1.5", "1.5"),
        ("0.001", "0.001"),
        ("100.", "100."),
        ("1E15", "1.E15"),
        ("-2.5E-7", "-2.5E-7"),
        ("0.0", "0."),
    ] {
        let Some(Value::Decimal(d)) = parse_real(text).unwrap() else {
            panic!("{text} is not a decimal");
        };
        assert_eq!(format_decimal(&d), expected, "{text}");
    }
}

#[test]
fn stack_objects_print_as_reenterable_text() {
    let mut rt = Runtime::new(RuntimeConfig::default()).unwrap();
    rt.execute("42 -3/4 2.5E-9 (1,-2) 3/2_km/h 'x^2-1' « 1 DUP + » 9223372036854775808")
        .unwrap();
    let original = rt.stack_values();
    let printed: Vec<String> = original.iter().map(ToString::to_string).collect();

    let mut again = Runtime::new(RuntimeConfig::default()).unwrap();
    again.execute(&printed.join(" ")).unwrap();
    assert_eq!(again.stack_values(), original, "{}", printed.join(" "));
}

use rplcore::runtime::{Key, Runtime, RuntimeConfig, RuntimeError, tower::Value};

fn runtime() -> Runtime {
    Runtime::new(RuntimeConfig::default()).unwrap()
}

/// Presses and releases each key in turn.
fn press(rt: &mut Runtime, keys: &[Key]) -> Result<(), RuntimeError> {
    for key in keys {
        let result = rt.push_key(key.code());
        rt.push_key(Key::RELEASE)?;
        result?;
    }
    Ok(())
}

#[test]
fn digits_build_a_command_line() {
    let mut rt = runtime();
    press(&mut rt, &[Key::One, Key::Two, Key::Dot, Key::Five]).unwrap();
    assert_eq!(rt.key_state().editor(), Some("12.5"));
    assert_eq!(rt.depth(), 0);
    press(&mut rt, &[Key::Enter]).unwrap();
    assert_eq!(rt.key_state().editor(), None);
    assert_eq!(rt.level(1).map(|v| v.to_string()), Some("12.5".into()));
}

#[test]
fn arithmetic_keys_enter_the_line_first() {
    let mut rt = runtime();
    press(&mut rt, &[Key::Two, Key::Enter, Key::Three, Key::Add]).unwrap();
    assert_eq!(rt.stack_values(), vec![Value::Integer(5)]);
}

#[test]
fn enter_without_a_line_duplicates() {
    let mut rt = runtime();
    press(&mut rt, &[Key::Seven, Key::Enter, Key::Enter, Key::Mul]).unwrap();
    assert_eq!(rt.stack_values(), vec![Value::Integer(49)]);
}

#[test]
fn held_keys_count_once() {
    let mut rt = runtime();
    rt.push_key(Key::One.code()).unwrap();
    rt.push_key(Key::One.code()).unwrap();
    rt.push_key(Key::RELEASE).unwrap();
    rt.push_key(Key::One.code()).unwrap();
    assert_eq!(rt.key_state().editor(), Some("11"));
}

#[test]
fn repeats_pass_through_when_suppression_is_off() {
    let mut rt = Runtime::new(RuntimeConfig {
        key_repeat_suppression: false,
        ..RuntimeConfig::default()
    })
    .unwrap();
    rt.push_key(Key::One.code()).unwrap();
    rt.push_key(Key::One.code()).unwrap();
    assert_eq!(rt.key_state().editor(), Some("11"));
}

#[test]
fn shift_selects_the_second_function() {
    let mut rt = runtime();
    press(&mut rt, &[Key::Two, Key::Enter, Key::One, Key::Zero, Key::Shift]).unwrap();
    assert!(rt.key_state().shift());
    press(&mut rt, &[Key::Inv]).unwrap();
    assert!(!rt.key_state().shift());
    assert_eq!(rt.stack_values(), vec![Value::Integer(1024)]);

    press(&mut rt, &[Key::Four, Key::Shift, Key::Bsp]).unwrap();
    assert_eq!(rt.depth(), 0);
}

#[test]
fn chs_edits_or_negates() {
    let mut rt = runtime();
    press(&mut rt, &[Key::Four, Key::Chs]).unwrap();
    assert_eq!(rt.key_state().editor(), Some("-4"));
    press(&mut rt, &[Key::Enter, Key::Chs]).unwrap();
    assert_eq!(rt.stack_values(), vec![Value::Integer(4)]);
}

#[test]
fn exponent_entry() {
    let mut rt = runtime();
    press(&mut rt, &[Key::E, Key::Three, Key::Chs, Key::Enter]).unwrap();
    assert_eq!(rt.level(1).map(|v| v.to_string()), Some("0.001".into()));
}

#[test]
fn backspace_edits_then_drops() {
    let mut rt = runtime();
    press(&mut rt, &[Key::Five, Key::Enter, Key::Six, Key::Seven, Key::Bsp]).unwrap();
    assert_eq!(rt.key_state().editor(), Some("6"));
    press(&mut rt, &[Key::Bsp, Key::Bsp]).unwrap();
    assert_eq!(rt.key_state().editor(), None);
    assert_eq!(rt.depth(), 0);
}

#[test]
fn exit_cancels_the_command_line() {
    let mut rt = runtime();
    press(&mut rt, &[Key::Nine, Key::Exit]).unwrap();
    assert_eq!(rt.key_state().editor(), None);
    assert_eq!(rt.depth(), 0);
}

#[test]
fn exit_while_idle_only_dismisses_the_error() {
    let mut rt = runtime();
    rt.execute("« 1 2 + »").unwrap();
    let err = press(&mut rt, &[Key::One, Key::Enter, Key::Zero, Key::Div]).unwrap_err();
    assert_eq!(err, RuntimeError::DivisionByZero);
    press(&mut rt, &[Key::Exit]).unwrap();
    assert_eq!(rt.last_error(), None);
    press(&mut rt, &[Key::Bsp, Key::Bsp, Key::Run]).unwrap();
    assert_eq!(rt.stack_values(), vec![Value::Integer(3)]);
}

#[test]
fn failed_key_commands_leave_the_stack_and_report() {
    let mut rt = runtime();
    let err = press(&mut rt, &[Key::One, Key::Enter, Key::Zero, Key::Div]).unwrap_err();
    assert_eq!(err, RuntimeError::DivisionByZero);
    assert_eq!(rt.stack_values(), vec![Value::Integer(1), Value::Integer(0)]);
    assert_eq!(rt.last_error(), Some(&RuntimeError::DivisionByZero));
}

#[test]
fn bad_command_lines_stay_in_the_editor() {
    let mut rt = runtime();
    press(&mut rt, &[Key::One, Key::Dot, Key::Dot]).unwrap();
    assert!(press(&mut rt, &[Key::Enter]).is_err());
    assert_eq!(rt.key_state().editor(), Some("1.."));
}

#[test]
fn unknown_codes_are_ignored() {
    let mut rt = runtime();
    rt.push_key(99).unwrap();
    rt.push_key(Key::RELEASE).unwrap();
    assert_eq!(rt.depth(), 0);
    assert_eq!(rt.key_state().editor(), None);
}

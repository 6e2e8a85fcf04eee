use num_bigint::BigInt;
use rplcore::runtime::{Runtime, RuntimeConfig, RuntimeError, tower::Value};

fn small_runtime(heap_bytes: usize, gc_enabled: bool) -> Runtime {
    Runtime::new(RuntimeConfig {
        heap_bytes,
        gc_enabled,
        ..RuntimeConfig::default()
    })
    .unwrap()
}

#[test]
fn repeated_arithmetic_fits_in_a_small_heap() {
    let mut rt = small_runtime(1024, true);
    rt.execute("1 2").unwrap();
    for _ in 0..500 {
        rt.execute("DUP +").unwrap();
    }
    assert_eq!(rt.level(1), Some(Value::Bignum(BigInt::from(1) << 501)));
    assert_eq!(rt.level(2), Some(Value::Integer(1)));
    assert!(rt.heap().total_collections() > 0);
}

#[test]
fn programs_survive_collections_while_running() {
    let mut rt = small_runtime(1024, true);
    rt.execute("« 1 + » 0").unwrap();
    for _ in 0..300 {
        rt.execute("OVER EVAL").unwrap();
    }
    assert_eq!(rt.level(1), Some(Value::Integer(300)));
    assert!(matches!(rt.level(2), Some(Value::Program(_))));
}

#[test]
fn unit_arithmetic_survives_collections() {
    let mut rt = small_runtime(1024, true);
    rt.execute("0_m").unwrap();
    for _ in 0..200 {
        rt.execute("1_km +").unwrap();
    }
    assert_eq!(rt.level(1).unwrap().to_string(), "200000_m");
}

#[test]
fn failed_commands_restore_the_stack_under_pressure() {
    let mut rt = small_runtime(512, true);
    rt.execute("1_km 2_s").unwrap();
    let before = rt.stack_values();
    for _ in 0..100 {
        let err = rt.execute("+").unwrap_err();
        assert!(matches!(err, RuntimeError::IncompatibleUnits { .. }));
        rt.execute("7 DROP").unwrap();
    }
    assert_eq!(rt.stack_values(), before);
}

#[test]
fn without_collection_the_heap_fills_up() {
    let mut rt = small_runtime(256, false);
    let err = loop {
        let depth = rt.depth();
        match rt.execute("12345") {
            Ok(()) => assert!(depth < 1000, "heap never filled up"),
            Err(err) => {
                assert_eq!(rt.depth(), depth);
                break err;
            }
        }
    };
    assert!(matches!(err, RuntimeError::OutOfMemory { .. }));
    assert!(rt.stack_values().iter().all(|v| *v == Value::Integer(12345)));
}

#[test]
fn dropping_levels_frees_their_objects() {
    let mut rt = small_runtime(4096, true);
    rt.execute("1 2 3 4 5 6 7 8").unwrap();
    rt.execute("CLEAR").unwrap();
    let stats = rt.collect();
    assert_eq!(stats.live_objects, 0);
    assert_eq!(rt.heap().used_bytes(), 0);
}

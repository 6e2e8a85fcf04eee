use num_bigint::BigInt;
use rplcore::{
    runtime::{
        RuntimeError,
        gc::{GcHeap, PayloadLimits},
        tower::{Decimal, Value},
    },
    syntax::{parse_expression, parse_unit_expression},
};

fn sample_values() -> Vec<Value> {
    vec![
        Value::Integer(-42),
        Value::Bignum(BigInt::from(1u128 << 100)),
        Value::from_ratio(3.into(), 7.into()),
        Value::Decimal(Decimal::new(314159.into(), -5)),
        Value::complex(Value::Integer(1), Value::from_ratio((-1).into(), 2.into())),
        Value::unit(Value::Integer(9), parse_unit_expression("m/s^2").unwrap()),
        Value::Symbol("alpha".into()),
        parse_expression("x^2+2*x-1").unwrap().into_value(),
        Value::Program(vec![
            Value::Integer(1),
            Value::unit(Value::Integer(2), parse_unit_expression("km").unwrap()),
            Value::Program(vec![Value::Symbol("y".into())]),
        ]),
    ]
}

#[test]
fn every_kind_of_object_round_trips() {
    let mut heap = GcHeap::new();
    for value in sample_values() {
        let handle = heap.store(&value).unwrap();
        assert_eq!(heap.load(&handle), value);
    }
}

#[test]
fn collection_keeps_held_objects_and_compacts() {
    let mut heap = GcHeap::new();
    for i in 0..200 {
        let _ = heap.store(&Value::Symbol(format!("garbage{i}"))).unwrap();
    }
    let kept: Vec<_> = sample_values()
        .iter()
        .map(|value| (heap.store(value).unwrap(), value.clone()))
        .collect();

    let stats = heap.collect();
    assert!(stats.bytes_after < stats.bytes_before);
    assert!(stats.reclaimed_objects >= 200);
    assert_eq!(heap.used_bytes(), stats.bytes_after);
    for (handle, value) in &kept {
        assert_eq!(&heap.load(handle), value);
    }
}

#[test]
fn full_heap_collects_before_failing() {
    let mut heap = GcHeap::with_capacity(512);
    for i in 0..2000 {
        let handle = heap.store(&Value::Integer(i)).unwrap();
        assert_eq!(heap.load(&handle), Value::Integer(i));
    }
    assert!(heap.total_collections() > 0);
}

#[test]
fn disabled_collection_runs_out_of_memory() {
    let mut heap = GcHeap::with_capacity(256);
    heap.set_enabled(false);
    let mut held = Vec::new();
    let err = loop {
        match heap.store(&Value::Integer(7)) {
            Ok(handle) => held.push(handle),
            Err(err) => break err,
        }
        assert!(held.len() < 1000, "heap never filled up");
    };
    assert!(matches!(err, RuntimeError::OutOfMemory { .. }));
    assert!(held.iter().all(|h| heap.load(h) == Value::Integer(7)));
}

#[test]
fn rooted_objects_survive_out_of_memory() {
    let mut heap = GcHeap::with_capacity(256);
    let mut held = Vec::new();
    while let Ok(handle) = heap.store(&Value::Integer(held.len() as i64)) {
        held.push(handle);
        assert!(held.len() < 1000, "heap never filled up");
    }
    for (i, handle) in held.iter().enumerate() {
        assert_eq!(heap.load(handle), Value::Integer(i as i64));
    }
}

#[test]
fn oversized_payloads_are_rejected() {
    let mut heap = GcHeap::new();
    heap.set_limits(PayloadLimits {
        max_bignum_bytes: 8,
        ..PayloadLimits::default()
    });
    let huge = Value::Bignum(BigInt::from(1u128 << 120));
    let err = heap.store(&huge).unwrap_err();
    assert!(matches!(err, RuntimeError::ObjectTooLarge { .. }));
    assert_eq!(heap.live_count(), 0);
}

#[test]
fn weak_references_expire_after_collection() {
    let mut heap = GcHeap::new();
    let held = heap.store(&Value::Symbol("kept".into())).unwrap();
    let dropped = heap.store(&Value::Symbol("gone".into())).unwrap();
    let weak_held = heap.downgrade(&held);
    let weak_dropped = heap.downgrade(&dropped);
    drop(dropped);

    heap.collect();
    let upgraded = heap.upgrade(&weak_held).expect("held object is alive");
    assert_eq!(heap.load(&upgraded), Value::Symbol("kept".into()));
    assert!(heap.upgrade(&weak_dropped).is_none());
}

#[test]
fn reused_slots_do_not_revive_old_weak_references() {
    let mut heap = GcHeap::new();
    let first = heap.store(&Value::Integer(1)).unwrap();
    let weak = heap.downgrade(&first);
    drop(first);
    heap.collect();

    let second = heap.store(&Value::Integer(2)).unwrap();
    assert_eq!(heap.load(&second), Value::Integer(2));
    assert!(heap.upgrade(&weak).is_none());
}

//! Rebinding moves every view in a tree at once.

use crate::common::{binder, seeded};
use memview::{BufferAccess, PrimitiveType::*, StructDescription, Value};
use rand::Rng;

fn record_desc() -> StructDescription {
    StructDescription::new()
        .field("kind", Uint8)
        .field("len", Uint32)
        .array("data", Int16, 3)
}

#[test]
fn test_rebind_matches_fresh_binding() {
    let b = binder();
    let layout = b.compile(&record_desc()).unwrap();
    let mut rng = seeded(3);

    // Fill memory with noise so every address reads differently
    for address in (0..1024).step_by(4) {
        b.memory()
            .set_single(Uint32, address, &Value::U32(rng.gen()))
            .unwrap();
    }

    let moving = b.bind(layout.clone(), 0, 1).unwrap();
    for _ in 0..100 {
        let target = rng.gen_range(0..1000u32);
        moving.rebind(target).unwrap();
        let fresh = b.bind(layout.clone(), target, 1).unwrap();
        assert_eq!(moving.get().unwrap(), fresh.get().unwrap());
        for member in layout.members() {
            let view = moving.try_field(&member.name).unwrap();
            assert_eq!(view.address(), target + member.offset);
        }
    }
}

#[test]
fn test_rebind_through_child_moves_parent() {
    let b = binder();
    let view = b.bind_layout(&record_desc(), 0).unwrap();
    let data = view.try_field("data").unwrap();
    data.element(1).unwrap().rebind(500).unwrap();
    assert_eq!(view.address(), 500 - 10);
    assert_eq!(data.address(), 498);
}

#[test]
fn test_offset_by_walks_an_array_of_structs() {
    let b = binder();
    let layout = b.compile(&record_desc()).unwrap();
    let table = b.bind(layout.clone(), 64, 4).unwrap();
    for (i, row) in table.elements().iter().enumerate() {
        row.try_field("len").unwrap().set(&Value::U32(i as u32 * 10)).unwrap();
    }

    let cursor = b.bind(layout.clone(), 64, 1).unwrap();
    for i in 0..4u32 {
        assert_eq!(cursor.try_field("len").unwrap().get().unwrap(), Value::U32(i * 10));
        cursor.offset_by(1).unwrap();
    }
    cursor.offset_by(-4).unwrap();
    assert_eq!(cursor.address(), 64);
}

#[test]
fn test_clone_at_leaves_original() {
    let b = binder();
    let view = b.bind_layout(&record_desc(), 0).unwrap();
    let other = view.clone_at(200).unwrap();
    other.rebind(300).unwrap();
    assert_eq!(view.address(), 0);
    assert_eq!(other.address(), 300);
}

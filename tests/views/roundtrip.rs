//! Values written through one view read back through a fresh one.

use crate::common::{binder, seeded};
use memview::{PrimitiveType, PrimitiveType::*, StructDescription, Value};
use rand::Rng;

fn sample(rng: &mut impl Rng, ty: PrimitiveType) -> Value {
    let bits: u64 = rng.gen();
    match ty.resolve() {
        Int8 => Value::I8(bits as i8),
        Uint8 => Value::U8(bits as u8),
        Int16 => Value::I16(bits as i16),
        Uint16 => Value::U16(bits as u16),
        Int32 => Value::I32(bits as i32),
        Uint32 => Value::U32(bits as u32),
        Int64 => Value::I64(bits as i64),
        Uint64 => Value::U64(bits),
        Float => Value::F32((bits % 100_000) as f32 / 8.0),
        Double => Value::F64(bits as f64 / 1024.0),
        Bool => Value::Bool(bits & 1 == 1),
        other => unreachable!("{other} is an alias"),
    }
}

#[test]
fn test_every_primitive_round_trips() {
    let b = binder();
    let mut rng = seeded(99);
    for _ in 0..20 {
        for ty in PrimitiveType::ALL {
            let address = rng.gen_range(0..900u32);
            let value = sample(&mut rng, ty);
            b.bind(ty, address, 1).unwrap().set(&value).unwrap();
            assert_eq!(b.bind(ty, address, 1).unwrap().get().unwrap(), value, "{ty}");
        }
    }
}

#[test]
fn test_array_element_addresses() {
    let b = binder();
    let view = b.bind(Int32, 100, 3).unwrap();
    let addresses: Vec<u32> = view.elements().iter().map(|e| e.address()).collect();
    assert_eq!(addresses, vec![100, 104, 108]);

    view.set(&Value::from(vec![-1i32, 0, 1])).unwrap();
    assert_eq!(b.bind(Int32, 108, 1).unwrap().get().unwrap(), Value::I32(1));
}

#[test]
fn test_struct_value_round_trip() {
    let b = binder();
    let point = StructDescription::new().field("x", Float).field("y", Float);
    let desc = StructDescription::new()
        .field("id", Uint16)
        .array("path", point, 2)
        .field("closed", Bool);
    let view = b.bind_layout(&desc, 32).unwrap();
    let value = Value::record([
        ("id", Value::U16(9)),
        (
            "path",
            Value::Array(vec![
                Value::record([("x", Value::F32(1.5)), ("y", Value::F32(-2.0))]),
                Value::record([("x", Value::F32(0.25)), ("y", Value::F32(8.0))]),
            ]),
        ),
        ("closed", Value::Bool(true)),
    ]);
    view.set(&value).unwrap();

    let fresh = b.bind_layout(&desc, 32).unwrap();
    assert_eq!(fresh.get().unwrap(), value);
    assert_eq!(fresh.try_field("closed").unwrap().address(), 32 + 20);
}

#[test]
fn test_union_members_alias() {
    let b = binder();
    let desc = StructDescription::union()
        .field("word", Uint32)
        .array("bytes", Uint8, 4);
    let view = b.bind_layout(&desc, 0).unwrap();
    view.try_field("word").unwrap().set(&Value::U32(0x0403_0201)).unwrap();
    assert_eq!(
        view.try_field("bytes").unwrap().get().unwrap(),
        Value::from(vec![1u8, 2, 3, 4])
    );
}

#[test]
fn test_cast_on_write() {
    let b = binder();
    let byte = b.bind(Uint8, 0, 1).unwrap();
    byte.set(&Value::I32(-1)).unwrap();
    assert_eq!(byte.get().unwrap(), Value::U8(0xff));

    let int = b.bind(Int32, 4, 1).unwrap();
    int.set(&Value::F64(-3.75)).unwrap();
    assert_eq!(int.get().unwrap(), Value::I32(-3));
}

//! Views keep working after the memory replaces its buffer.

use crate::common::{handle, TEST_PAGE};
use memview::{bind, BufferAccess, MemoryError, MemViewError, ObjectType, PrimitiveType::*, Value};
use std::rc::Rc;

#[test]
fn test_view_survives_growth() {
    let (memory, handle) = handle();
    let view = bind(handle.clone(), &ObjectType::new(Uint32).with_length(4), 16).unwrap();
    view.set(&Value::from(vec![1u32, 2, 3, 4])).unwrap();

    let old = memory.region();
    assert_eq!(memory.grow(2).unwrap(), 1);
    assert!(old.borrow().is_empty());

    assert_eq!(view.get().unwrap(), Value::from(vec![1u32, 2, 3, 4]));
    assert_eq!(handle.byte_length(), 3 * TEST_PAGE as usize);
}

#[test]
fn test_growth_makes_high_addresses_reachable() {
    let (memory, handle) = handle();
    let far = bind(handle.clone(), &ObjectType::new(Int64), TEST_PAGE + 8).unwrap();
    assert!(matches!(
        far.get().unwrap_err(),
        MemViewError::Memory(MemoryError::OutOfRange { .. })
    ));
    memory.grow(1).unwrap();
    far.set(&Value::I64(i64::MIN)).unwrap();
    assert_eq!(far.get().unwrap(), Value::I64(i64::MIN));
}

#[test]
fn test_growth_limit() {
    let (memory, _handle) = handle();
    let err = memory.grow(4).unwrap_err();
    assert_eq!(
        err,
        MemoryError::GrowthLimit {
            requested: 5,
            maximum: 4
        }
    );
    assert_eq!(memory.pages(), 1);
}

#[test]
fn test_detached_handle_fails_until_attached() {
    let (memory, _) = handle();
    let handle = Rc::new(memview::MemoryHandle::detached());
    let view = bind(handle.clone(), &ObjectType::new(Uint8), 0).unwrap();
    assert!(matches!(
        view.get().unwrap_err(),
        MemViewError::Memory(MemoryError::Detached)
    ));
    handle.attach(memory);
    assert_eq!(view.get().unwrap(), Value::U8(0));
}

//! Pointer fields, forward declarations and dereferencing.

use crate::common::binder;
use memview::{
    Declaration, ForwardDecl, MemViewError, MemberDescription, PrimitiveType::*,
    StructDescription, Value,
};
use std::rc::Rc;

fn node_layout(b: &memview::ViewBinder) -> (ForwardDecl, Rc<memview::CompiledLayout>) {
    let node = ForwardDecl::new();
    let layout = b
        .compile(
            &StructDescription::new()
                .member(MemberDescription::new("next", Pointer).points_to(node.clone()))
                .field("value", Int32),
        )
        .unwrap();
    node.define(layout.clone()).unwrap();
    (node, layout)
}

#[test]
fn test_self_referential_deref() {
    let b = binder();
    let (_node, layout) = node_layout(&b);
    let head = b.bind(layout.clone(), 0, 1).unwrap();
    head.try_field("next").unwrap().set(&Value::U32(200)).unwrap();

    let next = head.try_field("next").unwrap().deref().unwrap();
    assert_eq!(next.address(), 200);
    assert_eq!(next.try_field("value").unwrap().address(), 204);
}

#[test]
fn test_walk_linked_list() {
    let b = binder();
    let (_node, layout) = node_layout(&b);
    let addresses = [16u32, 400, 96, 720];
    for (i, &address) in addresses.iter().enumerate() {
        let next = addresses.get(i + 1).copied().unwrap_or(0);
        b.bind(layout.clone(), address, 1)
            .unwrap()
            .set(&Value::record([
                ("next", Value::U32(next)),
                ("value", Value::I32(i as i32 * 11)),
            ]))
            .unwrap();
    }

    let mut seen = Vec::new();
    let mut cursor = b.bind(layout.clone(), addresses[0], 1).unwrap();
    loop {
        seen.push(cursor.try_field("value").unwrap().get().unwrap());
        let next = cursor.try_field("next").unwrap();
        if next.pointer_value().unwrap() == 0 {
            break;
        }
        cursor = next.deref().unwrap();
    }
    assert_eq!(
        seen,
        vec![Value::I32(0), Value::I32(11), Value::I32(22), Value::I32(33)]
    );
}

#[test]
fn test_deref_rereads_pointer() {
    let b = binder();
    let ptr = b.create(&Declaration::pointer(Uint16)).unwrap().at(0).unwrap();
    ptr.set(&Value::U32(40)).unwrap();
    assert_eq!(ptr.deref().unwrap().address(), 40);
    ptr.set(&Value::U32(80)).unwrap();
    assert_eq!(ptr.deref().unwrap().address(), 80);
}

#[test]
fn test_pointer_to_pointer() {
    let b = binder();
    let ctor = b
        .create(&Declaration::pointer(Declaration::pointer(Int64)))
        .unwrap();
    let outer = ctor.at(0).unwrap();
    outer.set(&Value::U32(8)).unwrap();
    b.bind(Pointer, 8, 1).unwrap().set(&Value::U32(16)).unwrap();
    b.bind(Int64, 16, 1).unwrap().set(&Value::I64(-5)).unwrap();

    let value = outer.deref().unwrap().deref().unwrap().get().unwrap();
    assert_eq!(value, Value::I64(-5));
}

#[test]
fn test_constructor_as_pointee() {
    let b = binder();
    let pair = b
        .create(&Declaration::new(
            StructDescription::new().field("a", Int16).field("b", Int16),
        ))
        .unwrap();
    let ptr = b.create(&Declaration::pointer(&pair)).unwrap().at(0).unwrap();
    ptr.set(&Value::U32(32)).unwrap();
    pair.at(32)
        .unwrap()
        .set(&Value::record([("a", Value::I16(1)), ("b", Value::I16(2))]))
        .unwrap();
    let target = ptr.deref().unwrap();
    assert_eq!(target.try_field("b").unwrap().get().unwrap(), Value::I16(2));
}

#[test]
fn test_undefined_forward_declaration() {
    let b = binder();
    let ptr = b
        .create(&Declaration::pointer(ForwardDecl::new()))
        .unwrap()
        .at(0)
        .unwrap();
    assert!(matches!(
        ptr.deref().unwrap_err(),
        MemViewError::UnresolvedPointee
    ));
}

#[test]
fn test_plain_integer_is_not_dereferenceable() {
    let b = binder();
    let view = b.bind(Uint32, 0, 1).unwrap();
    assert!(!view.is_dereferenceable());
    assert!(matches!(
        view.deref().unwrap_err(),
        MemViewError::NotDereferenceable { address: 0 }
    ));
}

#[test]
fn test_forward_defined_with_temporary_layout() {
    let b = binder();
    let target = ForwardDecl::new();
    let view = b
        .bind_layout(
            &StructDescription::new()
                .member(MemberDescription::new("p", Pointer).points_to(target.clone())),
            0,
        )
        .unwrap();
    target
        .define(b.compile(&StructDescription::new().field("v", Int32)).unwrap())
        .unwrap();

    view.try_field("p").unwrap().set(&Value::U32(48)).unwrap();
    b.bind(Int32, 48, 1).unwrap().set(&Value::I32(17)).unwrap();
    let pointee = view.try_field("p").unwrap().deref().unwrap();
    assert_eq!(pointee.try_field("v").unwrap().get().unwrap(), Value::I32(17));
}

#[test]
fn test_mutually_referential_structs() {
    let b = binder();
    let to_b = ForwardDecl::new();
    let to_a = ForwardDecl::new();
    let a = b
        .compile(
            &StructDescription::new()
                .field("tag", Uint8)
                .member(MemberDescription::new("b", Pointer).points_to(to_b.clone())),
        )
        .unwrap();
    to_b.define(
        b.compile(
            &StructDescription::new()
                .member(MemberDescription::new("a", Pointer).points_to(to_a.clone()))
                .field("weight", Uint16),
        )
        .unwrap(),
    )
    .unwrap();
    to_a.define(a.clone()).unwrap();

    let first = b.bind(a, 0, 1).unwrap();
    first
        .set(&Value::record([("tag", Value::U8(1)), ("b", Value::U32(64))]))
        .unwrap();
    b.bind(Pointer, 64, 1).unwrap().set(&Value::U32(128)).unwrap();
    b.bind(Uint8, 128, 1).unwrap().set(&Value::U8(2)).unwrap();

    let second = first.try_field("b").unwrap().deref().unwrap();
    assert_eq!(second.address(), 64);
    let back = second.try_field("a").unwrap().deref().unwrap();
    assert_eq!(back.address(), 128);
    assert_eq!(back.try_field("tag").unwrap().get().unwrap(), Value::U8(2));
}

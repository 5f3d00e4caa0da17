//! Layout invariants over generated descriptions.

use crate::common::{random_description, round_up, seeded};
use memview::{compile, CompiledLayout, StructDescription};

const CASES: u64 = 500;

fn check_invariants(layout: &CompiledLayout) {
    if layout.alignment() > 0 {
        assert_eq!(layout.size() % layout.alignment(), 0, "{layout:?}");
    }
    if layout.is_union() {
        let widest = layout.members().iter().map(|m| m.footprint()).max().unwrap_or(0);
        assert!(layout.members().iter().all(|m| m.offset == 0));
        assert_eq!(layout.size(), round_up(widest, layout.alignment()));
    } else {
        let mut end = 0u32;
        for member in layout.members() {
            let align = member.ty.alignment();
            assert_eq!(member.offset, round_up(end, align), "{}", member.name);
            end = member.offset + member.footprint();
        }
        assert_eq!(layout.size(), round_up(end, layout.alignment()));
    }
    for member in layout.members() {
        if let Some(nested) = member.ty.as_layout() {
            check_invariants(nested);
        }
    }
}

#[test]
fn test_generated_layouts_satisfy_abi_rules() {
    let mut rng = seeded(0x5eed);
    for _ in 0..CASES {
        let desc = random_description(&mut rng, 2);
        let layout = compile(&desc).unwrap();
        check_invariants(&layout);
    }
}

#[test]
fn test_recompiling_compiled_layout_is_identity() {
    let mut rng = seeded(42);
    for _ in 0..CASES {
        let layout = compile(&random_description(&mut rng, 2)).unwrap();
        let again = compile(&StructDescription::from(layout.as_ref())).unwrap();
        assert_eq!(again, layout);

        // Nesting an existing layout places it like an equivalent description.
        let wrapped = compile(&StructDescription::new().field("inner", layout.clone())).unwrap();
        assert_eq!(wrapped.size(), layout.size());
        assert_eq!(wrapped.alignment(), layout.alignment());
    }
}

#[test]
fn test_member_lookup_matches_declaration_order() {
    let mut rng = seeded(7);
    for _ in 0..CASES {
        let layout = compile(&random_description(&mut rng, 1)).unwrap();
        for (i, member) in layout.members().iter().enumerate() {
            assert_eq!(layout.index_of(&member.name), Some(i));
            assert_eq!(layout.offset_of(&member.name).unwrap(), member.offset);
        }
    }
}

#![no_main]
use libfuzzer_sys::fuzz_target;
use memview::{compile, PrimitiveType, StructDescription};

// Each byte pair is one member: primitive index and array length.
fuzz_target!(|data: &[u8]| {
    let is_union = data.first().is_some_and(|b| b & 1 == 1);
    let mut desc = if is_union {
        StructDescription::union()
    } else {
        StructDescription::new()
    };
    for (i, pair) in data.get(1..).unwrap_or_default().chunks_exact(2).enumerate() {
        let ty = PrimitiveType::ALL[pair[0] as usize % PrimitiveType::ALL.len()];
        desc = desc.array(format!("m{i}"), ty, pair[1] as u32);
    }
    if let Ok(layout) = compile(&desc) {
        if layout.alignment() > 0 {
            assert_eq!(layout.size() % layout.alignment(), 0);
        }
        for member in layout.members() {
            assert!(member.offset + member.footprint() <= layout.size());
        }
    }
});

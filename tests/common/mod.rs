//! Common test utilities and helpers.

#![allow(dead_code)]

use memview::{
    LinearMemory, MemViewConfig, MemoryConfig, MemoryHandle, PrimitiveType, StructDescription,
    ViewBinder,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::rc::Rc;

/// Page size used by the small test memories.
pub const TEST_PAGE: u32 = 1024;

/// A one page memory that may grow to four pages.
pub fn small_memory() -> Rc<LinearMemory> {
    LinearMemory::new(MemoryConfig {
        page_size: TEST_PAGE,
        initial_pages: 1,
        maximum_pages: 4,
    })
    .expect("small memory")
}

/// A handle and the memory behind it.
pub fn handle() -> (Rc<LinearMemory>, Rc<MemoryHandle>) {
    let memory = small_memory();
    let handle = Rc::new(MemoryHandle::new(Rc::clone(&memory)));
    (memory, handle)
}

/// A binder over a fresh small memory.
pub fn binder() -> ViewBinder {
    ViewBinder::with_config(&MemViewConfig {
        memory: MemoryConfig {
            page_size: TEST_PAGE,
            initial_pages: 1,
            maximum_pages: 4,
        },
        ..MemViewConfig::default()
    })
    .expect("binder")
}

/// Seeded generator so failures reproduce.
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn random_primitive(rng: &mut impl Rng) -> PrimitiveType {
    PrimitiveType::ALL[rng.gen_range(0..PrimitiveType::ALL.len())]
}

/// A random struct or union with up to six members, nested up to `depth`.
pub fn random_description(rng: &mut impl Rng, depth: u32) -> StructDescription {
    let mut desc = if rng.gen_bool(0.25) {
        StructDescription::union()
    } else {
        StructDescription::new()
    };
    for i in 0..rng.gen_range(0..7) {
        let name = format!("m{i}");
        let length = rng.gen_range(0..4u32);
        desc = if depth > 0 && rng.gen_bool(0.2) {
            let nested = random_description(rng, depth - 1);
            desc.array(name, nested, length)
        } else {
            let p = random_primitive(rng);
            desc.array(name, p, length)
        };
    }
    desc
}

/// Round `value` up to a multiple of `align` (no-op for 0).
pub fn round_up(value: u32, align: u32) -> u32 {
    if align == 0 {
        value
    } else {
        value.div_ceil(align) * align
    }
}

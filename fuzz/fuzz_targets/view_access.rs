#![no_main]
use libfuzzer_sys::fuzz_target;
use memview::{MemViewConfig, MemoryConfig, PrimitiveType, Value, ViewBinder};

// Random binds, writes and rebinds must fail cleanly near the buffer end.
fuzz_target!(|data: &[u8]| {
    let config = MemViewConfig {
        memory: MemoryConfig {
            page_size: 256,
            initial_pages: 1,
            maximum_pages: 1,
        },
        ..MemViewConfig::default()
    };
    let Ok(binder) = ViewBinder::with_config(&config) else {
        return;
    };
    for op in data.chunks_exact(4) {
        let ty = PrimitiveType::ALL[op[0] as usize % PrimitiveType::ALL.len()];
        let address = u16::from_le_bytes([op[1], op[2]]) as u32;
        let Ok(view) = binder.bind(ty, address, (op[3] % 8) as u32) else {
            continue;
        };
        let _ = view.set(&Value::U8(op[3]));
        let _ = view.get();
        let _ = view.offset_by(op[3] as i64 - 128);
        let _ = binder.read_string(address);
    }
});

//! Error types for the buffer accessor.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    #[error("access of {len} bytes at {address:#x} is outside the {available} byte buffer")]
    OutOfRange {
        address: u32,
        len: usize,
        available: usize,
    },

    #[error("no linear memory is attached")]
    Detached,

    #[error("growing to {requested} pages exceeds the maximum of {maximum} pages")]
    GrowthLimit { requested: u64, maximum: u32 },
}

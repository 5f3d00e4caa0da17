//! Buffer accessor over a linear memory region.
//!
//! `BufferAccess` is the seam between bound views and the bytes they read:
//! implementations provide raw byte reads and writes at 32-bit addresses plus
//! an attachment check, and get typed little-endian accessors for every
//! primitive for free. `MemoryHandle` implements it over a growable
//! `LinearMemory`, re-attaching whenever the memory replaced its buffer.

pub mod error;
pub mod handle;
pub mod linear;

pub use self::error::MemoryError;
pub use self::handle::MemoryHandle;
pub use self::linear::{LinearMemory, SharedRegion};

use crate::core::primitive::PrimitiveType;
use crate::core::value::Value;
use crate::error::Result;

/// Bytes scanned per read when searching for a terminator.
const SCAN_CHUNK: usize = 256;

/// Little-endian reads and writes by absolute byte address.
///
/// Implementations must re-validate their buffer reference before every
/// access, since the owning memory may be resized between calls.
pub trait BufferAccess {
    /// Current length of the attached buffer in bytes.
    fn byte_length(&self) -> usize;

    /// Re-attach to the current buffer if the cached one was detached.
    fn ensure_attached(&self) -> std::result::Result<(), MemoryError>;

    /// Fill `out` with the bytes starting at `address`.
    fn read_bytes(&self, address: u32, out: &mut [u8]) -> std::result::Result<(), MemoryError>;

    /// Copy `bytes` into the buffer starting at `address`.
    fn write_bytes(&self, address: u32, bytes: &[u8]) -> std::result::Result<(), MemoryError>;

    /// Position of the first zero byte at or after `address`, relative to
    /// `address`, searching at most `limit` bytes.
    fn find_nul(
        &self,
        address: u32,
        limit: usize,
    ) -> std::result::Result<Option<usize>, MemoryError> {
        self.ensure_attached()?;
        let available = self
            .byte_length()
            .saturating_sub(address as usize)
            .min(limit);
        let mut chunk = [0u8; SCAN_CHUNK];
        let mut scanned = 0usize;
        while scanned < available {
            let n = (available - scanned).min(SCAN_CHUNK);
            self.read_bytes(address + scanned as u32, &mut chunk[..n])?;
            if let Some(pos) = memchr::memchr(0, &chunk[..n]) {
                return Ok(Some(scanned + pos));
            }
            scanned += n;
        }
        Ok(None)
    }

    /// Read one value of `ty` at `address`.
    fn get_single(&self, ty: PrimitiveType, address: u32) -> Result<Value> {
        let mut raw = [0u8; 8];
        let raw = &mut raw[..ty.size() as usize];
        self.read_bytes(address, raw)?;
        Ok(Value::decode(ty, raw))
    }

    /// Write one value of `ty` at `address`.
    fn set_single(&self, ty: PrimitiveType, address: u32, value: &Value) -> Result<()> {
        let mut raw = Vec::with_capacity(8);
        value.encode(ty, &mut raw)?;
        self.write_bytes(address, &raw)?;
        Ok(())
    }

    /// Read `length` consecutive values of `ty` starting at `address`.
    fn get_array(&self, ty: PrimitiveType, address: u32, length: u32) -> Result<Vec<Value>> {
        let stride = ty.size() as usize;
        let mut raw = vec![0u8; stride * length as usize];
        self.read_bytes(address, &mut raw)?;
        Ok(raw.chunks_exact(stride).map(|c| Value::decode(ty, c)).collect())
    }

    /// Write `values` as consecutive values of `ty` starting at `address`.
    fn set_array(&self, ty: PrimitiveType, address: u32, values: &[Value]) -> Result<()> {
        let mut raw = Vec::with_capacity(ty.size() as usize * values.len());
        for value in values {
            value.encode(ty, &mut raw)?;
        }
        self.write_bytes(address, &raw)?;
        Ok(())
    }
}

//! `MemoryHandle`: the buffer accessor over a `LinearMemory`.

use crate::memory::error::MemoryError;
use crate::memory::linear::{LinearMemory, SharedRegion};
use crate::memory::BufferAccess;
use bytes::BytesMut;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, trace};

/// Explicit holder of the "current buffer".
///
/// Caches the region the memory was backed by when last seen, and swaps it
/// for the memory's current region once the cached one reads as empty.
#[derive(Debug)]
pub struct MemoryHandle {
    memory: RefCell<Option<Rc<LinearMemory>>>,
    cached: RefCell<SharedRegion>,
}

fn empty_region() -> SharedRegion {
    Rc::new(RefCell::new(BytesMut::new()))
}

impl MemoryHandle {
    pub fn new(memory: Rc<LinearMemory>) -> Self {
        let cached = memory.region();
        Self {
            memory: RefCell::new(Some(memory)),
            cached: RefCell::new(cached),
        }
    }

    /// A handle with no memory attached; every access fails until `attach`.
    pub fn detached() -> Self {
        Self {
            memory: RefCell::new(None),
            cached: RefCell::new(empty_region()),
        }
    }

    /// Point the handle at `memory`, replacing any previous attachment.
    pub fn attach(&self, memory: Rc<LinearMemory>) {
        *self.cached.borrow_mut() = memory.region();
        *self.memory.borrow_mut() = Some(memory);
        debug!(bytes = self.cached.borrow().borrow().len(), "Attached linear memory");
    }

    pub fn detach(&self) {
        *self.memory.borrow_mut() = None;
        *self.cached.borrow_mut() = empty_region();
        debug!("Detached linear memory");
    }

    pub fn is_attached(&self) -> bool {
        self.memory.borrow().is_some()
    }

    pub fn memory(&self) -> Option<Rc<LinearMemory>> {
        self.memory.borrow().clone()
    }

    fn bounds(&self, address: u32, len: usize, available: usize) -> Result<usize, MemoryError> {
        let start = address as usize;
        match start.checked_add(len) {
            Some(end) if end <= available => Ok(start),
            _ => Err(MemoryError::OutOfRange {
                address,
                len,
                available,
            }),
        }
    }
}

impl BufferAccess for MemoryHandle {
    fn byte_length(&self) -> usize {
        self.cached.borrow().borrow().len()
    }

    fn ensure_attached(&self) -> Result<(), MemoryError> {
        if !self.cached.borrow().borrow().is_empty() {
            return Ok(());
        }
        let memory = self.memory.borrow();
        let memory = memory.as_ref().ok_or(MemoryError::Detached)?;
        let current = memory.region();
        if Rc::ptr_eq(&current, &self.cached.borrow()) {
            return Ok(());
        }
        debug!(
            bytes = current.borrow().len(),
            "Re-attaching to current memory region"
        );
        *self.cached.borrow_mut() = current;
        Ok(())
    }

    fn read_bytes(&self, address: u32, out: &mut [u8]) -> Result<(), MemoryError> {
        self.ensure_attached()?;
        let region = self.cached.borrow();
        let buf = region.borrow();
        let start = self.bounds(address, out.len(), buf.len())?;
        out.copy_from_slice(&buf[start..start + out.len()]);
        trace!(address, len = out.len(), "read");
        Ok(())
    }

    fn write_bytes(&self, address: u32, bytes: &[u8]) -> Result<(), MemoryError> {
        self.ensure_attached()?;
        let region = self.cached.borrow();
        let mut buf = region.borrow_mut();
        let start = self.bounds(address, bytes.len(), buf.len())?;
        buf[start..start + bytes.len()].copy_from_slice(bytes);
        trace!(address, len = bytes.len(), "write");
        Ok(())
    }

    fn find_nul(&self, address: u32, limit: usize) -> Result<Option<usize>, MemoryError> {
        self.ensure_attached()?;
        let region = self.cached.borrow();
        let buf = region.borrow();
        let start = self.bounds(address, 0, buf.len())?;
        let end = start.saturating_add(limit).min(buf.len());
        Ok(memchr::memchr(0, &buf[start..end]))
    }
}

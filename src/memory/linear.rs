//! Growable, page-based linear memory.
//!
//! Growing replaces the backing buffer. The previous buffer is detached
//! (truncated to zero length) so any handle still holding it notices on its
//! next access and re-attaches to the current one.

use crate::config::MemoryConfig;
use crate::error::{MemViewError, Result};
use crate::memory::error::MemoryError;
use bytes::BytesMut;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{debug, warn};

/// A reference to the buffer currently backing a `LinearMemory`.
pub type SharedRegion = Rc<RefCell<BytesMut>>;

/// A flat, byte-addressable, resizable memory region.
#[derive(Debug)]
pub struct LinearMemory {
    config: MemoryConfig,
    pages: Cell<u32>,
    region: RefCell<SharedRegion>,
}

impl LinearMemory {
    /// Allocate `config.initial_pages` zeroed pages.
    pub fn new(config: MemoryConfig) -> Result<Rc<Self>> {
        config.validate()?;
        let len = usize::try_from(config.bytes_for(config.initial_pages)).map_err(|_| {
            MemViewError::Config("memory.initial_pages does not fit in memory".to_string())
        })?;
        debug!(
            page_size = config.page_size,
            pages = config.initial_pages,
            "Allocating linear memory"
        );
        Ok(Rc::new(Self {
            pages: Cell::new(config.initial_pages),
            region: RefCell::new(Rc::new(RefCell::new(BytesMut::zeroed(len)))),
            config,
        }))
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// Current size in pages.
    pub fn pages(&self) -> u32 {
        self.pages.get()
    }

    /// Current size in bytes.
    pub fn byte_length(&self) -> usize {
        self.region.borrow().borrow().len()
    }

    /// The buffer currently backing this memory.
    pub fn region(&self) -> SharedRegion {
        Rc::clone(&self.region.borrow())
    }

    /// Grow by `delta` pages, returning the previous size in pages.
    ///
    /// Existing contents are preserved and the new pages are zeroed. The old
    /// buffer is detached.
    pub fn grow(&self, delta: u32) -> std::result::Result<u32, MemoryError> {
        let previous = self.pages.get();
        if delta == 0 {
            return Ok(previous);
        }
        let requested = previous as u64 + delta as u64;
        if requested > self.config.maximum_pages as u64 {
            warn!(
                requested,
                maximum = self.config.maximum_pages,
                "Refusing to grow linear memory"
            );
            return Err(MemoryError::GrowthLimit {
                requested,
                maximum: self.config.maximum_pages,
            });
        }
        let new_len = usize::try_from(requested * self.config.page_size as u64).map_err(|_| {
            MemoryError::GrowthLimit {
                requested,
                maximum: self.config.maximum_pages,
            }
        })?;

        let old = self.region();
        let mut grown = BytesMut::zeroed(new_len);
        {
            let old_bytes = old.borrow();
            grown[..old_bytes.len()].copy_from_slice(&old_bytes);
        }
        old.borrow_mut().clear();
        *self.region.borrow_mut() = Rc::new(RefCell::new(grown));
        self.pages.set(requested as u32);

        debug!(
            previous_pages = previous,
            pages = requested,
            bytes = new_len,
            "Grew linear memory"
        );
        Ok(previous)
    }
}

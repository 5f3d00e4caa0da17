//! Forward declarations for self-referential pointee types.
//!
//! A struct that points to its own shape cannot name its compiled layout
//! while that layout is being compiled. A `ForwardDecl` is an empty slot used
//! as the pointee during compilation and defined once the layout exists;
//! dereferencing resolves it lazily.

use crate::error::{MemViewError, Result};
use crate::layout::compiled::ObjectType;
use once_cell::unsync::OnceCell;
use std::fmt;
use std::rc::Rc;

/// A pointee type that is defined after the fact.
///
/// The slot holds its target strongly. A struct that points to itself forms
/// an `Rc` cycle between its layout and this slot, so such layouts live until
/// the end of the program.
#[derive(Clone, Default)]
pub struct ForwardDecl {
    slot: Rc<OnceCell<ObjectType>>,
}

impl ForwardDecl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the slot. A declaration can only be defined once.
    pub fn define(&self, object: impl Into<ObjectType>) -> Result<()> {
        self.slot
            .set(object.into())
            .map_err(|_| MemViewError::AlreadyDefined)
    }

    pub fn is_defined(&self) -> bool {
        self.slot.get().is_some()
    }

    /// The defined type, or `UnresolvedPointee` while the slot is empty.
    pub fn resolve(&self) -> Result<ObjectType> {
        self.slot
            .get()
            .cloned()
            .ok_or(MemViewError::UnresolvedPointee)
    }

    /// Whether both handles refer to the same slot.
    pub fn same_as(&self, other: &ForwardDecl) -> bool {
        Rc::ptr_eq(&self.slot, &other.slot)
    }
}

impl fmt::Debug for ForwardDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForwardDecl")
            .field("defined", &self.is_defined())
            .finish()
    }
}

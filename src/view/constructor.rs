//! Reusable view constructors.

use crate::error::Result;
use crate::layout::compiled::{ObjectType, Pointee};
use crate::layout::description::PointeeDescription;
use crate::memory::BufferAccess;
use crate::view::bound::{bind, BoundView};
use std::fmt;
use std::rc::Rc;

/// A compiled type paired with the memory it is read from.
///
/// `at` mounts a fresh view tree at any address; the same constructor can
/// also serve as the pointee of another declaration.
#[derive(Clone)]
pub struct ViewConstructor {
    memory: Rc<dyn BufferAccess>,
    object: ObjectType,
}

impl ViewConstructor {
    pub fn new(memory: Rc<dyn BufferAccess>, object: ObjectType) -> Self {
        Self { memory, object }
    }

    /// Bind a new view tree at `address`.
    pub fn at(&self, address: u32) -> Result<BoundView> {
        bind(Rc::clone(&self.memory), &self.object, address)
    }

    pub fn object_type(&self) -> &ObjectType {
        &self.object
    }

    /// Bytes occupied by one instance.
    pub fn size(&self) -> u64 {
        self.object.footprint()
    }

    pub fn alignment(&self) -> u32 {
        self.object.ty.alignment()
    }
}

impl From<&ViewConstructor> for Pointee {
    fn from(ctor: &ViewConstructor) -> Self {
        ctor.object.clone().into()
    }
}

impl From<&ViewConstructor> for PointeeDescription {
    fn from(ctor: &ViewConstructor) -> Self {
        PointeeDescription::Compiled(ctor.into())
    }
}

impl fmt::Debug for ViewConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewConstructor")
            .field("object", &self.object)
            .finish()
    }
}

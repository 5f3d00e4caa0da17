//! `ViewBinder`: one entry point owning the memory and string settings.

use crate::config::{MemViewConfig, StringsConfig};
use crate::error::Result;
use crate::layout::compiled::{CompiledLayout, ObjectType, TypeRef};
use crate::layout::compiler::{compile, compile_declaration};
use crate::layout::description::{Declaration, StructDescription};
use crate::memory::{BufferAccess, LinearMemory, MemoryHandle};
use crate::strings;
use crate::view::bound::{bind, BoundView};
use crate::view::constructor::ViewConstructor;
use std::rc::Rc;
use tracing::debug;

/// Compiles descriptions and binds views against a single buffer.
pub struct ViewBinder {
    access: Rc<dyn BufferAccess>,
    strings: StringsConfig,
}

impl ViewBinder {
    pub fn new(access: Rc<dyn BufferAccess>, strings: StringsConfig) -> Self {
        Self { access, strings }
    }

    /// Allocate a fresh `LinearMemory` sized by `config` and bind to it.
    pub fn with_config(config: &MemViewConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| crate::log_error!(e, "rejected memview config"))?;
        let memory = LinearMemory::new(config.memory.clone())?;
        debug!(bytes = memory.byte_length(), "Created view binder");
        Ok(Self::new(
            Rc::new(MemoryHandle::new(memory)),
            config.strings.clone(),
        ))
    }

    pub fn compile(&self, description: &StructDescription) -> Result<Rc<CompiledLayout>> {
        compile(description)
    }

    /// Compile `declaration` into a constructor bound to this binder's memory.
    pub fn create(&self, declaration: &Declaration) -> Result<ViewConstructor> {
        let object = compile_declaration(declaration)?;
        Ok(ViewConstructor::new(Rc::clone(&self.access), object))
    }

    /// Bind a view of `length` elements of `ty` at `address`.
    pub fn bind(&self, ty: impl Into<TypeRef>, address: u32, length: u32) -> Result<BoundView> {
        self.bind_object(&ObjectType::new(ty).with_length(length), address)
    }

    /// Bind `object` at `address`; `LayoutOverflow` if it exceeds 32 bits.
    pub fn bind_object(&self, object: &ObjectType, address: u32) -> Result<BoundView> {
        bind(Rc::clone(&self.access), object, address)
    }

    /// Compile `description` and bind one instance of it at `address`.
    pub fn bind_layout(&self, description: &StructDescription, address: u32) -> Result<BoundView> {
        let span = crate::span_trace!("bind_layout", address);
        let _guard = span.enter();
        let layout = compile(description)?;
        self.bind(layout, address, 1)
    }

    pub fn read_string(&self, address: u32) -> Result<String> {
        strings::read_string(self.access.as_ref(), address, &self.strings)
    }

    pub fn write_string(&self, address: u32, text: &str) -> Result<usize> {
        strings::write_string(self.access.as_ref(), address, text, &self.strings)
    }

    pub fn string_length(&self, address: u32) -> Result<usize> {
        strings::string_length(self.access.as_ref(), address, &self.strings)
    }

    pub fn memory(&self) -> &Rc<dyn BufferAccess> {
        &self.access
    }

    pub fn strings_config(&self) -> &StringsConfig {
        &self.strings
    }
}

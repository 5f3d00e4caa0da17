//! Typed views over a flat little-endian byte buffer.
//!
//! Describe C structs and unions, compile them once into 32-bit C-ABI
//! layouts, then bind views at addresses to read and write fields, walk
//! arrays, follow pointers and move whole view trees with `rebind`.
//!
//! ```
//! use memview::{MemViewConfig, PrimitiveType, StructDescription, Value, ViewBinder};
//!
//! let binder = ViewBinder::with_config(&MemViewConfig::default()).unwrap();
//! let view = binder
//!     .bind_layout(
//!         &StructDescription::new()
//!             .field("tag", PrimitiveType::Uint8)
//!             .field("count", PrimitiveType::Uint32),
//!         64,
//!     )
//!     .unwrap();
//! view.try_field("count").unwrap().set(&Value::U32(3)).unwrap();
//! assert_eq!(view.try_field("count").unwrap().address(), 68);
//! ```

/// Configuration for memory sizing and string handling
pub mod config;

/// Primitive type table and dynamic values
pub mod core;

/// Error types
pub mod error;

/// C-ABI struct layout compiler
pub mod layout;

/// Logging and tracing setup
pub mod logging;

/// Linear memory and the buffer accessor trait
pub mod memory;

/// NUL-terminated string helpers
pub mod strings;

/// Bound views
pub mod view;

pub use crate::config::{MemViewConfig, MemoryConfig, StringEncoding, StringsConfig};
pub use crate::core::primitive::{PrimitiveType, TypeData};
pub use crate::core::value::Value;
pub use crate::error::{MemViewError, Result};
pub use crate::layout::{
    compile, compile_declaration, CompiledLayout, Declaration, ForwardDecl, MemberDescription,
    ObjectType, StructDescription,
};
pub use crate::memory::{BufferAccess, LinearMemory, MemoryError, MemoryHandle};
pub use crate::view::{bind, BoundView, ViewBinder, ViewConstructor};

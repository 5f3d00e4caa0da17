//! C-ABI struct layout.
//!
//! Callers describe structs and unions with `StructDescription`, compile them
//! once into an immutable `CompiledLayout`, and reuse that layout for every
//! view bound afterwards.
//!
//! # Example
//!
//! ```
//! use memview::layout::{compile, StructDescription};
//! use memview::PrimitiveType;
//!
//! let layout = compile(
//!     &StructDescription::new()
//!         .field("a", PrimitiveType::Uint8)
//!         .field("b", PrimitiveType::Uint32),
//! )
//! .unwrap();
//! assert_eq!(layout.member("b").unwrap().offset, 4);
//! assert_eq!(layout.size(), 8);
//! ```

pub mod compiled;
pub mod compiler;
pub mod description;
pub mod forward;

pub use self::compiled::{CompiledLayout, CompiledMember, ObjectType, Pointee, TypeRef};
pub use self::compiler::{compile, compile_declaration};
pub use self::description::{
    Declaration, MemberDescription, PointeeDescription, StructDescription, TypeDescription,
};
pub use self::forward::ForwardDecl;

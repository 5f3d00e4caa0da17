//! Bound views over a buffer.
//!
//! A `BoundView` mirrors the shape of its compiled type: struct views hold one
//! child per member, array views one child per element. Every node stores only
//! its offset relative to the root, so `rebind` moves a whole tree by updating
//! a single base address.

pub mod binder;
pub mod bound;
pub mod constructor;

pub use self::binder::ViewBinder;
pub use self::bound::{bind, BoundView};
pub use self::constructor::ViewConstructor;

//! Error types for memview.
//!
//! Buffer-level failures live in `memory::MemoryError` and convert into the
//! crate-level `MemViewError` so callers only match on one type.

use crate::memory::MemoryError;
use thiserror::Error;

/// Main error type for memview operations.
#[derive(Debug, Error)]
pub enum MemViewError {
    /// Failure raised by the buffer accessor
    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),

    /// Two named members share a name within one layout
    #[error("Duplicate member '{0}' in struct description")]
    DuplicateMember(String),

    /// Offsets or sizes no longer fit a 32-bit address space
    #[error("Layout overflow while placing member '{member}'")]
    LayoutOverflow { member: String },

    /// Struct view or struct value has no member of that name
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Value shape does not match the view it is written to
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// Array value is longer than the array view
    #[error("Length mismatch: view holds {expected} elements, value has {found}")]
    LengthMismatch { expected: u32, found: usize },

    /// The view is not a pointer with a declared pointee
    #[error("View at {address:#x} has no pointee type")]
    NotDereferenceable { address: u32 },

    /// A forward declaration was dereferenced before being defined
    #[error("Pointee type was declared but never defined")]
    UnresolvedPointee,

    /// A forward declaration was defined twice
    #[error("Forward declaration is already defined")]
    AlreadyDefined,

    /// Rebinding would place a view outside the 32-bit address space
    #[error("Address {0} is outside the 32-bit address space")]
    InvalidAddress(i64),

    /// No NUL terminator within the scan budget
    #[error("Unterminated string at {address:#x} (scanned {scanned} bytes)")]
    UnterminatedString { address: u32, scanned: usize },

    /// Text cannot be represented in the configured string encoding
    #[error("Text not representable as {encoding}: {text:?}")]
    UnencodableText { encoding: String, text: String },

    /// Unknown primitive type name
    #[error("Invalid primitive type: {0}")]
    InvalidPrimitive(String),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for memview operations
pub type Result<T> = std::result::Result<T, MemViewError>;

//! Primitive type tags and the static type table.
//!
//! Every primitive has a fixed size and alignment for a 32-bit little-endian
//! target. C spellings such as `long`, `pointer` and `size_t` are aliases that
//! resolve to one of the fixed-width tags.

use crate::error::MemViewError;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Size and alignment of a primitive in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeData {
    pub size: u32,
    pub alignment: u32,
}

const INT8: TypeData = TypeData { size: 1, alignment: 1 };
const INT16: TypeData = TypeData { size: 2, alignment: 2 };
const INT32: TypeData = TypeData { size: 4, alignment: 4 };
const INT64: TypeData = TypeData { size: 8, alignment: 8 };
const FLOAT32: TypeData = TypeData { size: 4, alignment: 4 };
const FLOAT64: TypeData = TypeData { size: 8, alignment: 8 };

/// Primitive type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    // Fixed-width integers
    #[serde(rename = "int8_t")]
    Int8,
    #[serde(rename = "uint8_t")]
    Uint8,
    #[serde(rename = "int16_t")]
    Int16,
    #[serde(rename = "uint16_t")]
    Uint16,
    #[serde(rename = "int32_t")]
    Int32,
    #[serde(rename = "uint32_t")]
    Uint32,
    #[serde(rename = "int64_t")]
    Int64,
    #[serde(rename = "uint64_t")]
    Uint64,
    // Floating point
    #[serde(rename = "float")]
    Float,
    #[serde(rename = "double")]
    Double,
    // Basic C types
    #[serde(rename = "bool")]
    Bool,
    #[serde(rename = "char")]
    Char,
    #[serde(rename = "schar")]
    Schar,
    #[serde(rename = "uchar")]
    Uchar,
    #[serde(rename = "short")]
    Short,
    #[serde(rename = "ushort")]
    Ushort,
    #[serde(rename = "int")]
    Int,
    #[serde(rename = "uint")]
    Uint,
    #[serde(rename = "enum")]
    Enum,
    #[serde(rename = "long")]
    Long,
    #[serde(rename = "ulong")]
    Ulong,
    #[serde(rename = "llong")]
    Llong,
    #[serde(rename = "ullong")]
    Ullong,
    #[serde(rename = "pointer")]
    Pointer,
    #[serde(rename = "size_t")]
    SizeT,
}

impl PrimitiveType {
    /// Every tag, fixed-width tags first.
    pub const ALL: [PrimitiveType; 25] = [
        PrimitiveType::Int8,
        PrimitiveType::Uint8,
        PrimitiveType::Int16,
        PrimitiveType::Uint16,
        PrimitiveType::Int32,
        PrimitiveType::Uint32,
        PrimitiveType::Int64,
        PrimitiveType::Uint64,
        PrimitiveType::Float,
        PrimitiveType::Double,
        PrimitiveType::Bool,
        PrimitiveType::Char,
        PrimitiveType::Schar,
        PrimitiveType::Uchar,
        PrimitiveType::Short,
        PrimitiveType::Ushort,
        PrimitiveType::Int,
        PrimitiveType::Uint,
        PrimitiveType::Enum,
        PrimitiveType::Long,
        PrimitiveType::Ulong,
        PrimitiveType::Llong,
        PrimitiveType::Ullong,
        PrimitiveType::Pointer,
        PrimitiveType::SizeT,
    ];

    /// Resolve a C alias to the fixed-width tag it is stored as.
    pub const fn resolve(self) -> PrimitiveType {
        use PrimitiveType::*;
        match self {
            Char | Schar => Int8,
            Uchar => Uint8,
            Short => Int16,
            Ushort => Uint16,
            Int | Enum | Long => Int32,
            Uint | Ulong | Pointer | SizeT => Uint32,
            Llong => Int64,
            Ullong => Uint64,
            other => other,
        }
    }

    /// Size and alignment from the type table.
    pub const fn type_data(self) -> TypeData {
        use PrimitiveType::*;
        match self.resolve() {
            Int8 | Uint8 | Bool => INT8,
            Int16 | Uint16 => INT16,
            Int32 | Uint32 => INT32,
            Int64 | Uint64 => INT64,
            Float => FLOAT32,
            Double => FLOAT64,
            // resolve() only yields fixed-width tags
            _ => INT32,
        }
    }

    pub const fn size(self) -> u32 {
        self.type_data().size
    }

    pub const fn alignment(self) -> u32 {
        self.type_data().alignment
    }

    /// Whether values of this type hold an address.
    pub const fn is_pointer(self) -> bool {
        matches!(self, PrimitiveType::Pointer)
    }

    pub const fn is_float(self) -> bool {
        matches!(self.resolve(), PrimitiveType::Float | PrimitiveType::Double)
    }

    pub const fn is_signed(self) -> bool {
        use PrimitiveType::*;
        matches!(self.resolve(), Int8 | Int16 | Int32 | Int64 | Float | Double)
    }

    /// The C spelling of the tag.
    pub const fn name(self) -> &'static str {
        use PrimitiveType::*;
        match self {
            Int8 => "int8_t",
            Uint8 => "uint8_t",
            Int16 => "int16_t",
            Uint16 => "uint16_t",
            Int32 => "int32_t",
            Uint32 => "uint32_t",
            Int64 => "int64_t",
            Uint64 => "uint64_t",
            Float => "float",
            Double => "double",
            Bool => "bool",
            Char => "char",
            Schar => "schar",
            Uchar => "uchar",
            Short => "short",
            Ushort => "ushort",
            Int => "int",
            Uint => "uint",
            Enum => "enum",
            Long => "long",
            Ulong => "ulong",
            Llong => "llong",
            Ullong => "ullong",
            Pointer => "pointer",
            SizeT => "size_t",
        }
    }
}

static BY_NAME: Lazy<HashMap<&'static str, PrimitiveType>> =
    Lazy::new(|| PrimitiveType::ALL.iter().map(|t| (t.name(), *t)).collect());

impl FromStr for PrimitiveType {
    type Err = MemViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BY_NAME
            .get(s.trim())
            .copied()
            .ok_or_else(|| MemViewError::InvalidPrimitive(s.to_string()))
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

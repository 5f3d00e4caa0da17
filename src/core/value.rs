//! Dynamic values read from and written to bound views.

use crate::core::primitive::PrimitiveType;
use crate::error::{MemViewError, Result};
use serde::{Deserialize, Serialize};

/// A value of a primitive, an array, or a struct.
///
/// Struct values keep their members in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    Bool(bool),
    Array(Vec<Value>),
    Struct(Vec<(String, Value)>),
}

impl Value {
    /// Decode a little-endian value of `ty` from the first `ty.size()` bytes.
    ///
    /// Callers pass at least `ty.size()` bytes.
    pub(crate) fn decode(ty: PrimitiveType, bytes: &[u8]) -> Value {
        let mut raw = [0u8; 8];
        let size = ty.size() as usize;
        raw[..size].copy_from_slice(&bytes[..size]);
        match ty.resolve() {
            PrimitiveType::Int8 => Value::I8(raw[0] as i8),
            PrimitiveType::Uint8 => Value::U8(raw[0]),
            PrimitiveType::Int16 => Value::I16(i16::from_le_bytes([raw[0], raw[1]])),
            PrimitiveType::Uint16 => Value::U16(u16::from_le_bytes([raw[0], raw[1]])),
            PrimitiveType::Int32 => {
                Value::I32(i32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
            }
            PrimitiveType::Uint32 => {
                Value::U32(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
            }
            PrimitiveType::Int64 => Value::I64(i64::from_le_bytes(raw)),
            PrimitiveType::Uint64 => Value::U64(u64::from_le_bytes(raw)),
            PrimitiveType::Float => {
                Value::F32(f32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
            }
            PrimitiveType::Double => Value::F64(f64::from_le_bytes(raw)),
            _ => Value::Bool(raw[0] != 0),
        }
    }

    /// Append the little-endian encoding of this value as `ty` to `out`.
    ///
    /// Numeric values convert with C cast semantics: integers wrap to the
    /// target width, floats truncate toward zero, anything non-zero is `true`.
    pub fn encode(&self, ty: PrimitiveType, out: &mut Vec<u8>) -> Result<()> {
        let bits = self.int_bits().ok_or_else(|| self.mismatch(ty))?;
        match ty.resolve() {
            PrimitiveType::Int8 | PrimitiveType::Uint8 => out.push(bits as u8),
            PrimitiveType::Int16 | PrimitiveType::Uint16 => {
                out.extend_from_slice(&(bits as u16).to_le_bytes())
            }
            PrimitiveType::Int32 | PrimitiveType::Uint32 => {
                out.extend_from_slice(&(bits as u32).to_le_bytes())
            }
            PrimitiveType::Int64 | PrimitiveType::Uint64 => {
                out.extend_from_slice(&bits.to_le_bytes())
            }
            PrimitiveType::Float => {
                let f = self.as_f64().ok_or_else(|| self.mismatch(ty))?;
                out.extend_from_slice(&(f as f32).to_le_bytes())
            }
            PrimitiveType::Double => {
                let f = self.as_f64().ok_or_else(|| self.mismatch(ty))?;
                out.extend_from_slice(&f.to_le_bytes())
            }
            _ => out.push(u8::from(self.is_truthy())),
        }
        Ok(())
    }

    fn mismatch(&self, ty: PrimitiveType) -> MemViewError {
        MemViewError::TypeMismatch {
            expected: ty.to_string(),
            found: self.kind_name().to_string(),
        }
    }

    /// Short name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::I8(_) => "int8_t",
            Value::U8(_) => "uint8_t",
            Value::I16(_) => "int16_t",
            Value::U16(_) => "uint16_t",
            Value::I32(_) => "int32_t",
            Value::U32(_) => "uint32_t",
            Value::I64(_) => "int64_t",
            Value::U64(_) => "uint64_t",
            Value::F32(_) => "float",
            Value::F64(_) => "double",
            Value::Bool(_) => "bool",
            Value::Array(_) => "array",
            Value::Struct(_) => "struct",
        }
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::Array(_) | Value::Struct(_))
    }

    // Two's complement bit pattern, sign-extended from the source width.
    fn int_bits(&self) -> Option<u64> {
        Some(match *self {
            Value::I8(v) => v as i64 as u64,
            Value::U8(v) => v as u64,
            Value::I16(v) => v as i64 as u64,
            Value::U16(v) => v as u64,
            Value::I32(v) => v as i64 as u64,
            Value::U32(v) => v as u64,
            Value::I64(v) => v as u64,
            Value::U64(v) => v,
            Value::F32(v) => v as i64 as u64,
            Value::F64(v) => v as i64 as u64,
            Value::Bool(v) => v as u64,
            Value::Array(_) | Value::Struct(_) => return None,
        })
    }

    fn is_truthy(&self) -> bool {
        match *self {
            Value::F32(v) => v != 0.0,
            Value::F64(v) => v != 0.0,
            _ => self.int_bits().is_some_and(|b| b != 0),
        }
    }

    /// Scalar as a signed integer.
    pub fn as_i64(&self) -> Option<i64> {
        self.int_bits().map(|b| b as i64)
    }

    /// Scalar as an unsigned integer.
    pub fn as_u64(&self) -> Option<u64> {
        self.int_bits()
    }

    pub fn as_f64(&self) -> Option<f64> {
        Some(match *self {
            Value::I8(v) => v as f64,
            Value::U8(v) => v as f64,
            Value::I16(v) => v as f64,
            Value::U16(v) => v as f64,
            Value::I32(v) => v as f64,
            Value::U32(v) => v as f64,
            Value::I64(v) => v as f64,
            Value::U64(v) => v as f64,
            Value::F32(v) => v as f64,
            Value::F64(v) => v,
            Value::Bool(v) => u8::from(v) as f64,
            Value::Array(_) | Value::Struct(_) => return None,
        })
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.is_scalar().then(|| self.is_truthy())
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Struct(members) => Some(members),
            _ => None,
        }
    }

    /// Look up a member of a struct value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.as_struct()?
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Build a struct value from `(name, value)` pairs.
    pub fn record<I, S>(members: I) -> Value
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        Value::Struct(members.into_iter().map(|(n, v)| (n.into(), v)).collect())
    }
}

macro_rules! impl_from_scalar {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar!(
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    bool => Bool,
);

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

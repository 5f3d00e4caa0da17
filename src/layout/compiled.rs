//! Compiled layouts: resolved offsets, sizes and alignment.
//!
//! A `CompiledLayout` is immutable once built and is shared through `Rc`
//! between every nested use and every view bound to it.

use crate::core::primitive::PrimitiveType;
use crate::error::{MemViewError, Result};
use crate::layout::forward::ForwardDecl;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A resolved type: a primitive or a compiled struct/union.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TypeRef {
    Primitive(PrimitiveType),
    Struct(Rc<CompiledLayout>),
}

impl TypeRef {
    /// Byte size of one element.
    pub fn unit_size(&self) -> u32 {
        match self {
            TypeRef::Primitive(p) => p.size(),
            TypeRef::Struct(layout) => layout.size,
        }
    }

    pub fn alignment(&self) -> u32 {
        match self {
            TypeRef::Primitive(p) => p.alignment(),
            TypeRef::Struct(layout) => layout.alignment,
        }
    }

    pub fn as_primitive(&self) -> Option<PrimitiveType> {
        match self {
            TypeRef::Primitive(p) => Some(*p),
            TypeRef::Struct(_) => None,
        }
    }

    pub fn as_layout(&self) -> Option<&Rc<CompiledLayout>> {
        match self {
            TypeRef::Struct(layout) => Some(layout),
            TypeRef::Primitive(_) => None,
        }
    }
}

impl From<PrimitiveType> for TypeRef {
    fn from(p: PrimitiveType) -> Self {
        TypeRef::Primitive(p)
    }
}

impl From<Rc<CompiledLayout>> for TypeRef {
    fn from(layout: Rc<CompiledLayout>) -> Self {
        TypeRef::Struct(layout)
    }
}

/// The target of a pointer.
#[derive(Clone)]
pub enum Pointee {
    /// A type known when the pointer was compiled
    Resolved(Box<ObjectType>),
    /// A type defined later, resolved on dereference
    Forward(ForwardDecl),
}

impl Pointee {
    pub fn resolve(&self) -> Result<ObjectType> {
        match self {
            Pointee::Resolved(object) => Ok((**object).clone()),
            Pointee::Forward(fwd) => fwd.resolve(),
        }
    }
}

impl PartialEq for Pointee {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Pointee::Resolved(a), Pointee::Resolved(b)) => a == b,
            (Pointee::Forward(a), Pointee::Forward(b)) => a.same_as(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Pointee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pointee::Resolved(object) => f.debug_tuple("Resolved").field(object).finish(),
            Pointee::Forward(fwd) => f.debug_tuple("Forward").field(fwd).finish(),
        }
    }
}

impl From<ForwardDecl> for Pointee {
    fn from(fwd: ForwardDecl) -> Self {
        Pointee::Forward(fwd)
    }
}

impl From<ObjectType> for Pointee {
    fn from(object: ObjectType) -> Self {
        Pointee::Resolved(Box::new(object))
    }
}

/// A compiled declaration: what a view is bound from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectType {
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// Element count; 1 for scalars.
    pub length: u32,
    #[serde(skip)]
    pub points_to: Option<Pointee>,
}

impl ObjectType {
    pub fn new(ty: impl Into<TypeRef>) -> Self {
        Self {
            ty: ty.into(),
            length: 1,
            points_to: None,
        }
    }

    /// Set the element count; 0 is treated as 1.
    pub fn with_length(mut self, length: u32) -> Self {
        self.length = length.max(1);
        self
    }

    pub fn pointing_to(mut self, pointee: impl Into<Pointee>) -> Self {
        self.points_to = Some(pointee.into());
        self
    }

    pub fn unit_size(&self) -> u32 {
        self.ty.unit_size()
    }

    /// Total byte size of all elements.
    pub fn footprint(&self) -> u64 {
        self.unit_size() as u64 * self.length as u64
    }

    pub fn is_array(&self) -> bool {
        self.length > 1
    }

    /// `footprint` as a 32-bit size, or `LayoutOverflow` if it does not fit.
    pub fn byte_size(&self) -> Result<u32> {
        u32::try_from(self.footprint()).map_err(|_| MemViewError::LayoutOverflow {
            member: match &self.ty {
                TypeRef::Primitive(p) => format!("{p}[{}]", self.length),
                TypeRef::Struct(_) => format!("struct[{}]", self.length),
            },
        })
    }
}

impl From<PrimitiveType> for ObjectType {
    fn from(p: PrimitiveType) -> Self {
        ObjectType::new(p)
    }
}

impl From<Rc<CompiledLayout>> for ObjectType {
    fn from(layout: Rc<CompiledLayout>) -> Self {
        ObjectType::new(layout)
    }
}

/// A member with its offset from the start of the enclosing layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledMember {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    pub length: u32,
    pub offset: u32,
    #[serde(skip)]
    pub points_to: Option<Pointee>,
}

impl CompiledMember {
    pub fn unit_size(&self) -> u32 {
        self.ty.unit_size()
    }

    pub fn footprint(&self) -> u32 {
        self.unit_size() * self.length
    }

    /// The member's declaration without its offset.
    pub fn object_type(&self) -> ObjectType {
        ObjectType {
            ty: self.ty.clone(),
            length: self.length,
            points_to: self.points_to.clone(),
        }
    }
}

/// Offsets, size and alignment of a struct or union.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledLayout {
    pub(crate) members: Vec<CompiledMember>,
    pub(crate) alignment: u32,
    pub(crate) size: u32,
    pub(crate) is_union: bool,
    #[serde(skip)]
    pub(crate) index: HashMap<String, usize>,
}

impl CompiledLayout {
    /// A layout with no members: size 0, alignment 0.
    pub fn empty(is_union: bool) -> Self {
        Self {
            members: Vec::new(),
            alignment: 0,
            size: 0,
            is_union,
            index: HashMap::new(),
        }
    }

    pub fn members(&self) -> &[CompiledMember] {
        &self.members
    }

    /// Most restrictive member alignment; 0 for an empty layout.
    pub fn alignment(&self) -> u32 {
        self.alignment
    }

    /// Total size including trailing padding.
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn is_union(&self) -> bool {
        self.is_union
    }

    /// Empty layouts cannot be meaningfully placed in memory.
    pub fn is_addressable(&self) -> bool {
        self.size > 0
    }

    /// Position of a member in declaration order.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn member(&self, name: &str) -> Option<&CompiledMember> {
        self.index_of(name).map(|i| &self.members[i])
    }

    /// Offset of a member path relative to the start of this layout.
    ///
    /// Paths are dot-separated member names; array members accept an index,
    /// as in `"points[2].y"`.
    pub fn offset_of(&self, path: &str) -> Result<u32> {
        let unknown = || MemViewError::UnknownField(path.to_string());
        let mut layout = self;
        let mut offset = 0u32;
        let mut segments = path.split('.').peekable();

        while let Some(segment) = segments.next() {
            let (name, index) = parse_segment(segment).ok_or_else(unknown)?;
            let member = layout.member(name).ok_or_else(unknown)?;
            if index >= member.length {
                return Err(unknown());
            }
            offset = offset
                .checked_add(member.offset)
                .and_then(|o| o.checked_add(index.checked_mul(member.unit_size())?))
                .ok_or_else(unknown)?;
            if segments.peek().is_some() {
                layout = member.ty.as_layout().map(Rc::as_ref).ok_or_else(unknown)?;
            }
        }
        Ok(offset)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| MemViewError::Config(e.to_string()))
    }
}

// "name" or "name[3]"
fn parse_segment(segment: &str) -> Option<(&str, u32)> {
    match segment.split_once('[') {
        None if !segment.is_empty() => Some((segment, 0)),
        None => None,
        Some((name, rest)) => {
            let index = rest.strip_suffix(']')?.trim().parse().ok()?;
            (!name.is_empty()).then_some((name, index))
        }
    }
}

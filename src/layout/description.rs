//! Author-supplied type descriptions, the input of the layout compiler.

use crate::core::primitive::PrimitiveType;
use crate::layout::compiled::{CompiledLayout, ObjectType, Pointee, TypeRef};
use crate::layout::forward::ForwardDecl;
use std::rc::Rc;

/// The type of a declaration before layout.
#[derive(Debug, Clone)]
pub enum TypeDescription {
    Primitive(PrimitiveType),
    /// A nested struct or union, compiled recursively
    Struct(StructDescription),
    /// An already compiled layout, passed through unchanged
    Compiled(Rc<CompiledLayout>),
}

impl From<PrimitiveType> for TypeDescription {
    fn from(p: PrimitiveType) -> Self {
        TypeDescription::Primitive(p)
    }
}

impl From<StructDescription> for TypeDescription {
    fn from(s: StructDescription) -> Self {
        TypeDescription::Struct(s)
    }
}

impl From<Rc<CompiledLayout>> for TypeDescription {
    fn from(layout: Rc<CompiledLayout>) -> Self {
        TypeDescription::Compiled(layout)
    }
}

impl From<TypeRef> for TypeDescription {
    fn from(ty: TypeRef) -> Self {
        match ty {
            TypeRef::Primitive(p) => TypeDescription::Primitive(p),
            TypeRef::Struct(layout) => TypeDescription::Compiled(layout),
        }
    }
}

/// What a pointer declaration points to.
#[derive(Debug, Clone)]
pub enum PointeeDescription {
    /// Compiled together with the pointer
    Declaration(Box<Declaration>),
    /// Already compiled, or a forward declaration
    Compiled(Pointee),
}

impl From<Declaration> for PointeeDescription {
    fn from(d: Declaration) -> Self {
        PointeeDescription::Declaration(Box::new(d))
    }
}

impl From<PrimitiveType> for PointeeDescription {
    fn from(p: PrimitiveType) -> Self {
        Declaration::new(p).into()
    }
}

impl From<StructDescription> for PointeeDescription {
    fn from(s: StructDescription) -> Self {
        Declaration::new(s).into()
    }
}

impl From<ForwardDecl> for PointeeDescription {
    fn from(fwd: ForwardDecl) -> Self {
        PointeeDescription::Compiled(Pointee::Forward(fwd))
    }
}

impl From<ObjectType> for PointeeDescription {
    fn from(object: ObjectType) -> Self {
        PointeeDescription::Compiled(object.into())
    }
}

impl From<Pointee> for PointeeDescription {
    fn from(pointee: Pointee) -> Self {
        PointeeDescription::Compiled(pointee)
    }
}

/// A type with an element count and an optional pointee.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub ty: TypeDescription,
    /// Element count; 0 and 1 both mean a scalar.
    pub length: u32,
    /// Only meaningful when `ty` is `pointer`.
    pub points_to: Option<PointeeDescription>,
}

impl Declaration {
    pub fn new(ty: impl Into<TypeDescription>) -> Self {
        Self {
            ty: ty.into(),
            length: 1,
            points_to: None,
        }
    }

    /// A pointer to `pointee`.
    pub fn pointer(pointee: impl Into<PointeeDescription>) -> Self {
        Self::new(PrimitiveType::Pointer).points_to(pointee)
    }

    pub fn array(mut self, length: u32) -> Self {
        self.length = length;
        self
    }

    pub fn points_to(mut self, pointee: impl Into<PointeeDescription>) -> Self {
        self.points_to = Some(pointee.into());
        self
    }
}

impl From<PrimitiveType> for Declaration {
    fn from(p: PrimitiveType) -> Self {
        Declaration::new(p)
    }
}

impl From<StructDescription> for Declaration {
    fn from(s: StructDescription) -> Self {
        Declaration::new(s)
    }
}

impl From<Rc<CompiledLayout>> for Declaration {
    fn from(layout: Rc<CompiledLayout>) -> Self {
        Declaration::new(layout)
    }
}

/// A named member. An empty name marks a padding slot that is skipped.
#[derive(Debug, Clone)]
pub struct MemberDescription {
    pub name: String,
    pub declaration: Declaration,
}

impl MemberDescription {
    pub fn new(name: impl Into<String>, declaration: impl Into<Declaration>) -> Self {
        Self {
            name: name.into(),
            declaration: declaration.into(),
        }
    }

    pub fn array(mut self, length: u32) -> Self {
        self.declaration.length = length;
        self
    }

    pub fn points_to(mut self, pointee: impl Into<PointeeDescription>) -> Self {
        self.declaration.points_to = Some(pointee.into());
        self
    }

    pub fn is_padding(&self) -> bool {
        self.name.is_empty()
    }
}

/// An ordered list of members, laid out as a struct or a union.
#[derive(Debug, Clone, Default)]
pub struct StructDescription {
    pub members: Vec<MemberDescription>,
    pub is_union: bool,
}

impl StructDescription {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn union() -> Self {
        Self {
            members: Vec::new(),
            is_union: true,
        }
    }

    pub fn member(mut self, member: MemberDescription) -> Self {
        self.members.push(member);
        self
    }

    /// Shorthand for a scalar member.
    pub fn field(self, name: impl Into<String>, ty: impl Into<TypeDescription>) -> Self {
        self.member(MemberDescription::new(name, Declaration::new(ty)))
    }

    /// Shorthand for an array member.
    pub fn array(
        self,
        name: impl Into<String>,
        ty: impl Into<TypeDescription>,
        length: u32,
    ) -> Self {
        self.member(MemberDescription::new(name, Declaration::new(ty).array(length)))
    }
}

impl From<&CompiledLayout> for StructDescription {
    /// Describe an existing layout; compiling the result reproduces it.
    fn from(layout: &CompiledLayout) -> Self {
        StructDescription {
            members: layout
                .members()
                .iter()
                .map(|m| MemberDescription {
                    name: m.name.clone(),
                    declaration: Declaration {
                        ty: m.ty.clone().into(),
                        length: m.length,
                        points_to: m.points_to.clone().map(PointeeDescription::Compiled),
                    },
                })
                .collect(),
            is_union: layout.is_union(),
        }
    }
}

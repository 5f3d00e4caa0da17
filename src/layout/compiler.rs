//! The layout compiler.
//!
//! Members are placed in declaration order at the smallest offset that
//! satisfies their alignment; union members all sit at offset 0. The total
//! size is rounded up to the most restrictive member alignment, matching what
//! a C compiler emits for a 32-bit little-endian target.

use crate::error::{MemViewError, Result};
use crate::layout::compiled::{CompiledLayout, CompiledMember, ObjectType, Pointee, TypeRef};
use crate::layout::description::{
    Declaration, PointeeDescription, StructDescription, TypeDescription,
};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

/// Compile a struct or union description into an immutable layout.
pub fn compile(description: &StructDescription) -> Result<Rc<CompiledLayout>> {
    let mut members = Vec::with_capacity(description.members.len());
    let mut index = HashMap::with_capacity(description.members.len());
    let mut cursor: u32 = 0;
    let mut alignment: u32 = 0;
    let mut size: u32 = 0;

    for member in &description.members {
        if member.is_padding() {
            continue;
        }
        let overflow = || MemViewError::LayoutOverflow {
            member: member.name.clone(),
        };

        let decl = &member.declaration;
        let ty = resolve_type(&decl.ty)?;
        let member_alignment = ty.alignment();
        let length = decl.length.max(1);

        // Padding; never applies to unions, which keep the cursor at 0.
        if !description.is_union && member_alignment > 0 && cursor % member_alignment != 0 {
            cursor = cursor
                .checked_add(member_alignment - cursor % member_alignment)
                .ok_or_else(overflow)?;
        }
        let offset = cursor;
        let footprint = ty.unit_size().checked_mul(length).ok_or_else(overflow)?;

        if description.is_union {
            size = size.max(footprint);
        } else {
            cursor = cursor.checked_add(footprint).ok_or_else(overflow)?;
            size = cursor;
        }
        alignment = alignment.max(member_alignment);

        if index.insert(member.name.clone(), members.len()).is_some() {
            return Err(MemViewError::DuplicateMember(member.name.clone()));
        }
        members.push(CompiledMember {
            name: member.name.clone(),
            ty,
            length,
            offset,
            points_to: decl.points_to.as_ref().map(compile_pointee).transpose()?,
        });
    }

    // Trailing padding
    if alignment > 0 && size % alignment != 0 {
        size = size
            .checked_add(alignment - size % alignment)
            .ok_or_else(|| MemViewError::LayoutOverflow {
                member: "<trailing padding>".to_string(),
            })?;
    }

    debug!(
        members = members.len(),
        size,
        alignment,
        is_union = description.is_union,
        "Compiled struct layout"
    );

    Ok(Rc::new(CompiledLayout {
        members,
        alignment,
        size,
        is_union: description.is_union,
        index,
    }))
}

/// Compile a standalone declaration into the type a view is bound from.
///
/// Pointee declarations are compiled eagerly; forward declarations are kept
/// as they are and resolved on dereference.
pub fn compile_declaration(declaration: &Declaration) -> Result<ObjectType> {
    let object = ObjectType {
        ty: resolve_type(&declaration.ty)?,
        length: declaration.length.max(1),
        points_to: declaration
            .points_to
            .as_ref()
            .map(compile_pointee)
            .transpose()?,
    };
    object.byte_size()?;
    Ok(object)
}

fn resolve_type(ty: &TypeDescription) -> Result<TypeRef> {
    Ok(match ty {
        TypeDescription::Primitive(p) => TypeRef::Primitive(*p),
        TypeDescription::Struct(nested) => TypeRef::Struct(compile(nested)?),
        TypeDescription::Compiled(layout) => TypeRef::Struct(Rc::clone(layout)),
    })
}

fn compile_pointee(pointee: &PointeeDescription) -> Result<Pointee> {
    Ok(match pointee {
        PointeeDescription::Declaration(decl) => compile_declaration(decl)?.into(),
        PointeeDescription::Compiled(p) => p.clone(),
    })
}

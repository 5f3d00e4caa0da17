//! Bound views: compiled types mounted at an address.
//!
//! A view tree is built once from an `ObjectType`. Every node stores only its
//! offset relative to the root; the root's base address lives in an anchor
//! shared by the whole tree, so rebinding any node moves every node at once
//! without rebuilding anything. Building a tree never touches the buffer:
//! reads and writes happen in `get`, `set` and `deref`.

use crate::core::primitive::PrimitiveType;
use crate::core::value::Value;
use crate::error::{MemViewError, Result};
use crate::layout::compiled::{CompiledLayout, ObjectType, TypeRef};
use crate::memory::BufferAccess;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use tracing::trace;

/// Shared state of one view tree: the only mutable address and the memory.
struct Anchor {
    base: Cell<u32>,
    memory: Rc<dyn BufferAccess>,
}

enum Shape<'a> {
    Scalar(PrimitiveType),
    PrimitiveArray(PrimitiveType),
    Struct(&'a Rc<CompiledLayout>),
    StructArray,
}

/// A live, address-bound view of a primitive, struct, or array.
pub struct BoundView {
    anchor: Rc<Anchor>,
    offset: u32,
    object: ObjectType,
    // Struct: one per member in declaration order. Arrays: one per element.
    children: Vec<BoundView>,
}

/// Bind `object` at `address`, building the whole view tree.
///
/// Fails with `LayoutOverflow` when the object does not fit a 32-bit address
/// space.
pub fn bind(
    memory: Rc<dyn BufferAccess>,
    object: &ObjectType,
    address: u32,
) -> Result<BoundView> {
    object.byte_size()?;
    let anchor = Rc::new(Anchor {
        base: Cell::new(address),
        memory,
    });
    build(&anchor, object.clone(), 0)
}

fn build(anchor: &Rc<Anchor>, object: ObjectType, offset: u32) -> Result<BoundView> {
    let overflow = || MemViewError::LayoutOverflow {
        member: format!("element at offset {offset:#x}"),
    };
    let stride = object.unit_size();
    let children = if object.is_array() {
        (0..object.length)
            .map(|i| {
                let element = ObjectType {
                    ty: object.ty.clone(),
                    length: 1,
                    points_to: object.points_to.clone(),
                };
                let at = i
                    .checked_mul(stride)
                    .and_then(|o| o.checked_add(offset))
                    .ok_or_else(overflow)?;
                build(anchor, element, at)
            })
            .collect::<Result<_>>()?
    } else if let TypeRef::Struct(layout) = &object.ty {
        layout
            .members()
            .iter()
            .map(|m| {
                let at = offset.checked_add(m.offset).ok_or_else(overflow)?;
                build(anchor, m.object_type(), at)
            })
            .collect::<Result<_>>()?
    } else {
        Vec::new()
    };

    Ok(BoundView {
        anchor: Rc::clone(anchor),
        offset,
        object,
        children,
    })
}

impl BoundView {
    fn shape(&self) -> Shape<'_> {
        match (&self.object.ty, self.object.is_array()) {
            (TypeRef::Primitive(p), false) => Shape::Scalar(*p),
            (TypeRef::Primitive(p), true) => Shape::PrimitiveArray(*p),
            (TypeRef::Struct(layout), false) => Shape::Struct(layout),
            (TypeRef::Struct(_), true) => Shape::StructArray,
        }
    }

    /// Absolute address: the root's base plus this node's fixed offset.
    pub fn address(&self) -> u32 {
        self.anchor.base.get().saturating_add(self.offset)
    }

    /// Base address of the root of this tree.
    pub fn base_address(&self) -> u32 {
        self.anchor.base.get()
    }

    /// Offset from the root, fixed at construction.
    pub fn relative_offset(&self) -> u32 {
        self.offset
    }

    pub fn object_type(&self) -> &ObjectType {
        &self.object
    }

    pub fn type_ref(&self) -> &TypeRef {
        &self.object.ty
    }

    pub fn length(&self) -> u32 {
        self.object.length
    }

    /// Byte size of one element; the stride of arrays and of `offset_by`.
    pub fn unit_size(&self) -> u32 {
        self.object.unit_size()
    }

    /// Byte size of the whole view.
    pub fn size(&self) -> u32 {
        u32::try_from(self.object.footprint()).unwrap_or(u32::MAX)
    }

    pub fn alignment(&self) -> u32 {
        self.object.ty.alignment()
    }

    pub fn is_array(&self) -> bool {
        self.object.is_array()
    }

    /// Layout of a struct or struct-array view.
    pub fn layout(&self) -> Option<&Rc<CompiledLayout>> {
        self.object.ty.as_layout()
    }

    pub fn memory(&self) -> &Rc<dyn BufferAccess> {
        &self.anchor.memory
    }

    /// Member view of a (non-array) struct view.
    pub fn field(&self, name: &str) -> Option<&BoundView> {
        match self.shape() {
            Shape::Struct(layout) => layout.index_of(name).map(|i| &self.children[i]),
            _ => None,
        }
    }

    pub fn try_field(&self, name: &str) -> Result<&BoundView> {
        self.field(name)
            .ok_or_else(|| MemViewError::UnknownField(name.to_string()))
    }

    /// Member views in declaration order; empty unless this is a struct view.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &BoundView)> + '_ {
        let members = match self.shape() {
            Shape::Struct(layout) => layout.members(),
            _ => &[],
        };
        members
            .iter()
            .zip(self.children.iter())
            .map(|(m, view)| (m.name.as_str(), view))
    }

    /// Element view of an array view.
    pub fn element(&self, index: u32) -> Option<&BoundView> {
        if self.is_array() {
            self.children.get(index as usize)
        } else {
            None
        }
    }

    /// Element views; empty unless this is an array view.
    pub fn elements(&self) -> &[BoundView] {
        if self.is_array() {
            &self.children
        } else {
            &[]
        }
    }

    /// Read the current contents.
    pub fn get(&self) -> Result<Value> {
        let memory = &self.anchor.memory;
        match self.shape() {
            Shape::Scalar(p) => memory.get_single(p, self.address()),
            Shape::PrimitiveArray(p) => Ok(Value::Array(memory.get_array(
                p,
                self.address(),
                self.object.length,
            )?)),
            Shape::Struct(_) => Ok(Value::Struct(
                self.fields()
                    .map(|(name, view)| Ok((name.to_string(), view.get()?)))
                    .collect::<Result<_>>()?,
            )),
            Shape::StructArray => Ok(Value::Array(
                self.children
                    .iter()
                    .map(BoundView::get)
                    .collect::<Result<_>>()?,
            )),
        }
    }

    /// Write `value`.
    ///
    /// Struct values may name a subset of the members; members not named are
    /// left untouched. Array values may be shorter than the view. The whole
    /// value is checked against the view's shape before the first byte is
    /// written.
    pub fn set(&self, value: &Value) -> Result<()> {
        self.check(value)?;
        self.write(value)
    }

    fn check(&self, value: &Value) -> Result<()> {
        match (self.shape(), value) {
            (Shape::Scalar(_), v) if v.is_scalar() => Ok(()),
            (Shape::PrimitiveArray(_), Value::Array(items)) => {
                self.check_length(items.len())?;
                match items.iter().find(|v| !v.is_scalar()) {
                    Some(v) => Err(self.mismatch(v)),
                    None => Ok(()),
                }
            }
            (Shape::Struct(_), Value::Struct(members)) => members
                .iter()
                .try_for_each(|(name, v)| self.try_field(name)?.check(v)),
            (Shape::StructArray, Value::Array(items)) => {
                self.check_length(items.len())?;
                self.children
                    .iter()
                    .zip(items)
                    .try_for_each(|(view, v)| view.check(v))
            }
            (_, v) => Err(self.mismatch(v)),
        }
    }

    // Only called on values that passed `check`.
    fn write(&self, value: &Value) -> Result<()> {
        let memory = &self.anchor.memory;
        match (self.shape(), value) {
            (Shape::Scalar(p), v) => memory.set_single(p, self.address(), v),
            (Shape::PrimitiveArray(p), Value::Array(items)) => {
                memory.set_array(p, self.address(), items)
            }
            (Shape::Struct(_), Value::Struct(members)) => members
                .iter()
                .try_for_each(|(name, v)| self.try_field(name)?.write(v)),
            (Shape::StructArray, Value::Array(items)) => self
                .children
                .iter()
                .zip(items)
                .try_for_each(|(view, v)| view.write(v)),
            (_, v) => Err(self.mismatch(v)),
        }
    }

    fn mismatch(&self, found: &Value) -> MemViewError {
        MemViewError::TypeMismatch {
            expected: self.describe(),
            found: found.kind_name().to_string(),
        }
    }

    fn check_length(&self, found: usize) -> Result<()> {
        if found > self.object.length as usize {
            return Err(MemViewError::LengthMismatch {
                expected: self.object.length,
                found,
            });
        }
        Ok(())
    }

    fn describe(&self) -> String {
        let base = match &self.object.ty {
            TypeRef::Primitive(p) => p.to_string(),
            TypeRef::Struct(l) if l.is_union() => "union".to_string(),
            TypeRef::Struct(_) => "struct".to_string(),
        };
        if self.is_array() {
            format!("{base}[{}]", self.object.length)
        } else {
            base
        }
    }

    /// Whether `deref` is available: a scalar with a declared pointee.
    pub fn is_dereferenceable(&self) -> bool {
        self.object.points_to.is_some() && matches!(self.shape(), Shape::Scalar(_))
    }

    /// Current value of a scalar interpreted as an address.
    pub fn pointer_value(&self) -> Result<u32> {
        let raw = self.get()?;
        raw.as_u64()
            .map(|v| v as u32)
            .ok_or_else(|| MemViewError::TypeMismatch {
                expected: PrimitiveType::Pointer.to_string(),
                found: raw.kind_name().to_string(),
            })
    }

    /// Follow the pointer: read its current value and bind the pointee there.
    ///
    /// Every call re-reads the pointer and builds a new, independent tree.
    pub fn deref(&self) -> Result<BoundView> {
        let pointee = match (&self.object.points_to, self.shape()) {
            (Some(pointee), Shape::Scalar(_)) => pointee,
            _ => {
                return Err(MemViewError::NotDereferenceable {
                    address: self.address(),
                })
            }
        };
        let object = pointee.resolve()?;
        let target = self.pointer_value()?;
        trace!(from = self.address(), to = target, "Dereferencing pointer");
        bind(Rc::clone(&self.anchor.memory), &object, target)
    }

    /// Move the whole tree so that this view sits at `address`.
    pub fn rebind(&self, address: u32) -> Result<&Self> {
        let base = address
            .checked_sub(self.offset)
            .ok_or(MemViewError::InvalidAddress(
                address as i64 - self.offset as i64,
            ))?;
        self.anchor.base.set(base);
        Ok(self)
    }

    /// Move the whole tree by `n` elements of this view's unit size.
    pub fn offset_by(&self, n: i64) -> Result<&Self> {
        let target = (self.address() as i64)
            .checked_add(n.saturating_mul(self.unit_size() as i64))
            .unwrap_or(i64::MAX);
        let address = u32::try_from(target).map_err(|_| MemViewError::InvalidAddress(target))?;
        self.rebind(address)
    }

    /// An independent tree of the same type rooted at `address`.
    pub fn clone_at(&self, address: u32) -> Result<BoundView> {
        bind(Rc::clone(&self.anchor.memory), &self.object, address)
    }
}

impl fmt::Debug for BoundView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundView")
            .field("address", &format_args!("{:#x}", self.address()))
            .field("type", &self.describe())
            .field("children", &self.children.len())
            .finish()
    }
}

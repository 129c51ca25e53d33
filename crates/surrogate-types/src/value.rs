//! Dynamic value model
//!
//! [`Value`] is what behaviors return and what the default engine
//! synthesizes. Composite shapes (arrays, completed tasks, sequences, tuples)
//! are modelled structurally so callers can inspect them without downcasting.

use crate::descriptor::{AsyncKind, SequenceKind, TypeDescriptor};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A dynamic value
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// Absent reference or empty nullable
    #[default]
    Null,
    /// No value (void)
    Unit,
    /// Boolean
    Bool(bool),
    /// Unicode scalar
    Char(char),
    /// Signed 8-bit integer
    I8(i8),
    /// Signed 16-bit integer
    I16(i16),
    /// Signed 32-bit integer
    I32(i32),
    /// Signed 64-bit integer
    I64(i64),
    /// Unsigned 8-bit integer
    U8(u8),
    /// Unsigned 16-bit integer
    U16(u16),
    /// Unsigned 32-bit integer
    U32(u32),
    /// Unsigned 64-bit integer
    U64(u64),
    /// 32-bit float
    F32(f32),
    /// 64-bit float
    F64(f64),
    /// Owned string
    String(String),
    /// Enumeration member (possibly unnamed)
    Enum(EnumValue),
    /// User-defined value type
    Struct(StructValue),
    /// Array of any rank
    Array(ArrayValue),
    /// Already-completed asynchronous result
    Task(TaskValue),
    /// Finite lazy sequence
    Sequence(SequenceValue),
    /// Value tuple
    Tuple(Vec<Value>),
    /// Shared object handle compared by identity
    Object(ObjectRef),
}

impl Value {
    /// Check if value is `Null`
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short name of the value's kind (for diagnostics)
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Unit => "unit",
            Self::Bool(_) => "bool",
            Self::Char(_) => "char",
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::String(_) => "string",
            Self::Enum(_) => "enum",
            Self::Struct(_) => "struct",
            Self::Array(_) => "array",
            Self::Task(_) => "task",
            Self::Sequence(_) => "sequence",
            Self::Tuple(_) => "tuple",
            Self::Object(_) => "object",
        }
    }

    /// Borrow as array
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&ArrayValue> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Borrow as completed task
    #[inline]
    #[must_use]
    pub fn as_task(&self) -> Option<&TaskValue> {
        match self {
            Self::Task(t) => Some(t),
            _ => None,
        }
    }

    /// Borrow as sequence
    #[inline]
    #[must_use]
    pub fn as_sequence(&self) -> Option<&SequenceValue> {
        match self {
            Self::Sequence(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow tuple elements
    #[inline]
    #[must_use]
    pub fn as_tuple(&self) -> Option<&[Value]> {
        match self {
            Self::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow as object handle
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }
}

/// Enumeration member
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    /// Enumeration name
    pub ty: String,
    /// Integral discriminant
    pub discriminant: i64,
}

impl EnumValue {
    /// Create enum value
    #[inline]
    #[must_use]
    pub fn new(ty: impl Into<String>, discriminant: i64) -> Self {
        Self {
            ty: ty.into(),
            discriminant,
        }
    }

    /// Zero-valued member
    #[inline]
    #[must_use]
    pub fn zero(ty: &str) -> Self {
        Self::new(ty, 0)
    }
}

/// User-defined value type instance
#[derive(Debug, Clone, PartialEq)]
pub struct StructValue {
    /// Struct name
    pub ty: String,
    /// Field values in declaration order
    pub fields: Vec<(String, Value)>,
}

impl StructValue {
    /// Look up field by name
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }
}

/// Array of any rank
///
/// Items are stored row-major; the product of `lengths` equals `items.len()`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValue {
    element: TypeDescriptor,
    lengths: Vec<usize>,
    items: Vec<Value>,
}

impl ArrayValue {
    /// Create array with every dimension of length zero
    #[must_use]
    pub fn empty(element: TypeDescriptor, rank: usize) -> Self {
        Self {
            element,
            lengths: vec![0; rank.max(1)],
            items: Vec::new(),
        }
    }

    /// Create single-dimension array from items
    #[must_use]
    pub fn from_vec(element: TypeDescriptor, items: Vec<Value>) -> Self {
        Self {
            element,
            lengths: vec![items.len()],
            items,
        }
    }

    /// Element type
    #[inline]
    #[must_use]
    pub fn element(&self) -> &TypeDescriptor {
        &self.element
    }

    /// Number of dimensions
    #[inline]
    #[must_use]
    pub fn rank(&self) -> usize {
        self.lengths.len()
    }

    /// Length of dimension `dim`
    #[inline]
    #[must_use]
    pub fn length(&self, dim: usize) -> Option<usize> {
        self.lengths.get(dim).copied()
    }

    /// Lengths of all dimensions
    #[inline]
    #[must_use]
    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    /// Total number of items
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if array has no items
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate items in row-major order
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    /// Consume into row-major items
    #[inline]
    #[must_use]
    pub fn into_items(self) -> Vec<Value> {
        self.items
    }
}

impl<'a> IntoIterator for &'a ArrayValue {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Already-completed asynchronous result
///
/// Values of this kind never represent pending work: the dispatch core only
/// ever hands out settled tasks.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskValue {
    kind: AsyncKind,
    result: Option<Box<Value>>,
}

impl TaskValue {
    /// Create completed task; `None` means the task wraps void
    #[inline]
    #[must_use]
    pub fn completed(kind: AsyncKind, result: Option<Value>) -> Self {
        Self {
            kind,
            result: result.map(Box::new),
        }
    }

    /// Wrapper flavor
    #[inline]
    #[must_use]
    pub fn kind(&self) -> AsyncKind {
        self.kind
    }

    /// Always `true`
    #[inline]
    #[must_use]
    pub fn is_completed(&self) -> bool {
        true
    }

    /// Result value, `None` for void tasks
    #[inline]
    #[must_use]
    pub fn result(&self) -> Option<&Value> {
        self.result.as_deref()
    }

    /// Ready future yielding the result (`Unit` for void tasks)
    #[must_use]
    pub fn into_future(self) -> futures::future::Ready<Value> {
        futures::future::ready(self.result.map_or(Value::Unit, |value| *value))
    }
}

/// Finite lazy sequence
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceValue {
    kind: SequenceKind,
    element: TypeDescriptor,
    items: Vec<Value>,
}

impl SequenceValue {
    /// Create exhausted sequence
    #[inline]
    #[must_use]
    pub fn empty(kind: SequenceKind, element: TypeDescriptor) -> Self {
        Self {
            kind,
            element,
            items: Vec::new(),
        }
    }

    /// Create sequence over items
    #[inline]
    #[must_use]
    pub fn from_items(kind: SequenceKind, element: TypeDescriptor, items: Vec<Value>) -> Self {
        Self {
            kind,
            element,
            items,
        }
    }

    /// Sequence flavor
    #[inline]
    #[must_use]
    pub fn kind(&self) -> SequenceKind {
        self.kind
    }

    /// Element type
    #[inline]
    #[must_use]
    pub fn element(&self) -> &TypeDescriptor {
        &self.element
    }

    /// Number of elements
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if sequence yields nothing
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate elements
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a SequenceValue {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Shared handle to an arbitrary object
///
/// Equality is identity: two handles are equal only when they point at the
/// same allocation.
#[derive(Clone)]
pub struct ObjectRef {
    type_name: &'static str,
    inner: Arc<dyn Any + Send + Sync>,
}

impl ObjectRef {
    /// Wrap a value in a new shared handle
    #[inline]
    #[must_use]
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Wrap an existing allocation
    #[inline]
    #[must_use]
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            inner: value,
        }
    }

    /// Rust type name of the wrapped object
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Borrow the object as `T`
    #[inline]
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Clone out a typed handle
    #[must_use]
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.inner).downcast::<T>().ok()
    }

    /// Check if both handles point at the same object
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectRef").field(&self.type_name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_array_keeps_rank() {
        let array = ArrayValue::empty(TypeDescriptor::I32, 3);
        assert_eq!(array.rank(), 3);
        assert_eq!(array.lengths(), &[0, 0, 0]);
        assert!(array.is_empty());
        assert_eq!(array.iter().count(), 0);
    }

    #[test]
    fn completed_task_resolves_immediately() {
        let task = TaskValue::completed(AsyncKind::Task, Some(Value::Bool(false)));
        assert!(task.is_completed());
        assert_eq!(futures::executor::block_on(task.into_future()), Value::Bool(false));
    }

    #[test]
    fn void_task_resolves_to_unit() {
        let task = TaskValue::completed(AsyncKind::ValueTask, None);
        assert!(task.result().is_none());
        assert_eq!(futures::executor::block_on(task.into_future()), Value::Unit);
    }

    #[test]
    fn object_equality_is_identity() {
        let a = ObjectRef::new(vec![1, 2, 3]);
        let b = ObjectRef::new(vec![1, 2, 3]);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn object_downcast() {
        let obj = ObjectRef::new(String::from("hello"));
        assert_eq!(obj.downcast_ref::<String>().map(String::as_str), Some("hello"));
        assert!(obj.downcast_ref::<i32>().is_none());
        assert!(obj.downcast::<String>().is_some());
    }

    #[test]
    fn struct_field_lookup() {
        let value = StructValue {
            ty: "Point".to_string(),
            fields: vec![("x".to_string(), Value::I32(1))],
        };
        assert_eq!(value.field("x"), Some(&Value::I32(1)));
        assert!(value.field("y").is_none());
    }
}

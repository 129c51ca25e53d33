//! Type descriptors
//!
//! Provides [`TypeDescriptor`], a closed classification of every type shape
//! the dispatch core has to reason about. Descriptors are derived on demand
//! by whatever produces call sites and are never persisted by the core.

use crate::value::{ArrayValue, EnumValue, StructValue, TaskValue, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name used for the universal reference type
pub const OBJECT_TYPE_NAME: &str = "object";

/// Name used for the string reference type
pub const STRING_TYPE_NAME: &str = "string";

/// Primitive value types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveType {
    /// Boolean
    Bool,
    /// Unicode scalar
    Char,
    /// Signed 8-bit integer
    I8,
    /// Signed 16-bit integer
    I16,
    /// Signed 32-bit integer
    I32,
    /// Signed 64-bit integer
    I64,
    /// Unsigned 8-bit integer
    U8,
    /// Unsigned 16-bit integer
    U16,
    /// Unsigned 32-bit integer
    U32,
    /// Unsigned 64-bit integer
    U64,
    /// 32-bit float
    F32,
    /// 64-bit float
    F64,
}

impl PrimitiveType {
    /// Zero bit-pattern value of this primitive
    #[must_use]
    pub fn zero(self) -> Value {
        match self {
            Self::Bool => Value::Bool(false),
            Self::Char => Value::Char('\0'),
            Self::I8 => Value::I8(0),
            Self::I16 => Value::I16(0),
            Self::I32 => Value::I32(0),
            Self::I64 => Value::I64(0),
            Self::U8 => Value::U8(0),
            Self::U16 => Value::U16(0),
            Self::U32 => Value::U32(0),
            Self::U64 => Value::U64(0),
            Self::F32 => Value::F32(0.0),
            Self::F64 => Value::F64(0.0),
        }
    }

    /// Short lowercase name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Char => "char",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }
}

/// Enumeration type
///
/// Only the name and the underlying integral type matter for synthesis:
/// the zero value is discriminant `0` whether or not a member is named so.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumType {
    /// Enumeration name
    pub name: String,
    /// Underlying integral type
    pub underlying: PrimitiveType,
}

/// Field of a user-defined value type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name
    pub name: String,
    /// Field type
    pub ty: TypeDescriptor,
}

/// User-defined value type (struct)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructType {
    /// Struct name
    pub name: String,
    /// Fields in declaration order
    pub fields: Vec<FieldDescriptor>,
}

/// Asynchronous single-value wrappers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AsyncKind {
    /// Heap-allocated task
    Task,
    /// Value-type task
    ValueTask,
}

impl AsyncKind {
    fn name(self) -> &'static str {
        match self {
            Self::Task => "Task",
            Self::ValueTask => "ValueTask",
        }
    }
}

/// Lazy sequence contracts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceKind {
    /// Plain enumerable sequence
    Enumerable,
    /// Queryable sequence
    Queryable,
}

impl SequenceKind {
    fn name(self) -> &'static str {
        match self {
            Self::Enumerable => "Enumerable",
            Self::Queryable => "Queryable",
        }
    }
}

/// Description of a requested type shape
///
/// Adding a shape means extending this enum; every `match` over it in the
/// workspace is exhaustive, so the compiler points at each rule to update.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeDescriptor {
    /// No value (void return)
    Void,

    /// Primitive value type
    Primitive(PrimitiveType),

    /// Enumeration value type
    Enum(EnumType),

    /// User-defined value type
    Struct(StructType),

    /// Nullable wrapper around a value type
    Nullable(Box<TypeDescriptor>),

    /// Plain reference type (class or interface) identified by name
    Reference(String),

    /// Array of `element` with `rank` dimensions
    Array {
        /// Element type
        element: Box<TypeDescriptor>,
        /// Number of dimensions (at least 1)
        rank: usize,
    },

    /// By-reference slot to the inner type (ref/out parameter, ref return)
    ByRef(Box<TypeDescriptor>),

    /// Asynchronous single-value wrapper; `None` wraps void
    Async {
        /// Wrapper flavor
        kind: AsyncKind,
        /// Wrapped result type
        result: Option<Box<TypeDescriptor>>,
    },

    /// Lazy sequence contract; `None` is the non-generic form
    Sequence {
        /// Sequence flavor
        kind: SequenceKind,
        /// Element type
        element: Option<Box<TypeDescriptor>>,
    },

    /// Value tuple of the element types
    Tuple(Vec<TypeDescriptor>),

    /// Any other closed generic instantiation (reference semantics)
    Generic {
        /// Generic type name without arity suffix
        name: String,
        /// Type arguments
        args: Vec<TypeDescriptor>,
    },
}

impl TypeDescriptor {
    /// `bool`
    pub const BOOL: Self = Self::Primitive(PrimitiveType::Bool);
    /// `char`
    pub const CHAR: Self = Self::Primitive(PrimitiveType::Char);
    /// `i32`
    pub const I32: Self = Self::Primitive(PrimitiveType::I32);
    /// `i64`
    pub const I64: Self = Self::Primitive(PrimitiveType::I64);
    /// `u8`
    pub const U8: Self = Self::Primitive(PrimitiveType::U8);
    /// `f64`
    pub const F64: Self = Self::Primitive(PrimitiveType::F64);

    /// Universal reference type
    #[inline]
    #[must_use]
    pub fn object() -> Self {
        Self::Reference(OBJECT_TYPE_NAME.to_string())
    }

    /// String reference type
    #[inline]
    #[must_use]
    pub fn string() -> Self {
        Self::Reference(STRING_TYPE_NAME.to_string())
    }

    /// Named reference type
    #[inline]
    #[must_use]
    pub fn reference(name: impl Into<String>) -> Self {
        Self::Reference(name.into())
    }

    /// Enumeration with the given underlying type
    #[inline]
    #[must_use]
    pub fn enumeration(name: impl Into<String>, underlying: PrimitiveType) -> Self {
        Self::Enum(EnumType {
            name: name.into(),
            underlying,
        })
    }

    /// User-defined value type
    #[must_use]
    pub fn structure<N: Into<String>>(
        name: impl Into<String>,
        fields: impl IntoIterator<Item = (N, TypeDescriptor)>,
    ) -> Self {
        Self::Struct(StructType {
            name: name.into(),
            fields: fields
                .into_iter()
                .map(|(name, ty)| FieldDescriptor {
                    name: name.into(),
                    ty,
                })
                .collect(),
        })
    }

    /// Nullable wrapper
    #[inline]
    #[must_use]
    pub fn nullable(inner: Self) -> Self {
        Self::Nullable(Box::new(inner))
    }

    /// Single-dimension array
    #[inline]
    #[must_use]
    pub fn array_of(element: Self) -> Self {
        Self::array(element, 1)
    }

    /// Array with `rank` dimensions (rank 0 is treated as 1)
    #[inline]
    #[must_use]
    pub fn array(element: Self, rank: usize) -> Self {
        Self::Array {
            element: Box::new(element),
            rank: rank.max(1),
        }
    }

    /// By-reference slot
    #[inline]
    #[must_use]
    pub fn by_ref(inner: Self) -> Self {
        Self::ByRef(Box::new(inner))
    }

    /// `Task` wrapping void
    #[inline]
    #[must_use]
    pub fn task() -> Self {
        Self::Async {
            kind: AsyncKind::Task,
            result: None,
        }
    }

    /// `Task` wrapping `result`
    #[inline]
    #[must_use]
    pub fn task_of(result: Self) -> Self {
        Self::Async {
            kind: AsyncKind::Task,
            result: Some(Box::new(result)),
        }
    }

    /// `ValueTask` wrapping void
    #[inline]
    #[must_use]
    pub fn value_task() -> Self {
        Self::Async {
            kind: AsyncKind::ValueTask,
            result: None,
        }
    }

    /// `ValueTask` wrapping `result`
    #[inline]
    #[must_use]
    pub fn value_task_of(result: Self) -> Self {
        Self::Async {
            kind: AsyncKind::ValueTask,
            result: Some(Box::new(result)),
        }
    }

    /// Non-generic enumerable
    #[inline]
    #[must_use]
    pub fn enumerable() -> Self {
        Self::Sequence {
            kind: SequenceKind::Enumerable,
            element: None,
        }
    }

    /// Enumerable of `element`
    #[inline]
    #[must_use]
    pub fn enumerable_of(element: Self) -> Self {
        Self::Sequence {
            kind: SequenceKind::Enumerable,
            element: Some(Box::new(element)),
        }
    }

    /// Non-generic queryable
    #[inline]
    #[must_use]
    pub fn queryable() -> Self {
        Self::Sequence {
            kind: SequenceKind::Queryable,
            element: None,
        }
    }

    /// Queryable of `element`
    #[inline]
    #[must_use]
    pub fn queryable_of(element: Self) -> Self {
        Self::Sequence {
            kind: SequenceKind::Queryable,
            element: Some(Box::new(element)),
        }
    }

    /// Value tuple
    #[inline]
    #[must_use]
    pub fn tuple(elements: impl IntoIterator<Item = Self>) -> Self {
        Self::Tuple(elements.into_iter().collect())
    }

    /// Closed generic instantiation
    #[inline]
    #[must_use]
    pub fn generic(name: impl Into<String>, args: impl IntoIterator<Item = Self>) -> Self {
        Self::Generic {
            name: name.into(),
            args: args.into_iter().collect(),
        }
    }

    /// Check if this is the void descriptor
    #[inline]
    #[must_use]
    pub fn is_void(&self) -> bool {
        matches!(self, Self::Void)
    }

    /// Check if this is a by-reference slot
    #[inline]
    #[must_use]
    pub fn is_by_ref(&self) -> bool {
        matches!(self, Self::ByRef(_))
    }

    /// Strip one level of by-reference indirection
    #[inline]
    #[must_use]
    pub fn element_of_ref(&self) -> &Self {
        match self {
            Self::ByRef(inner) => inner,
            other => other,
        }
    }

    /// Check if values of this shape are copied rather than referenced
    #[must_use]
    pub fn is_value_type(&self) -> bool {
        match self {
            Self::Primitive(_)
            | Self::Enum(_)
            | Self::Struct(_)
            | Self::Nullable(_)
            | Self::Tuple(_) => true,
            Self::Async { kind, .. } => *kind == AsyncKind::ValueTask,
            Self::Void
            | Self::Reference(_)
            | Self::Array { .. }
            | Self::ByRef(_)
            | Self::Sequence { .. }
            | Self::Generic { .. } => false,
        }
    }

    /// Zero bit-pattern value of this shape
    ///
    /// Numeric zero for primitives, discriminant `0` for enums, field-wise
    /// zero for structs and tuples, `Null` for every reference shape.
    #[must_use]
    pub fn zeroed(&self) -> Value {
        match self {
            Self::Void => Value::Unit,
            Self::Primitive(p) => p.zero(),
            Self::Enum(e) => Value::Enum(EnumValue::zero(&e.name)),
            Self::Struct(s) => Value::Struct(StructValue {
                ty: s.name.clone(),
                fields: s
                    .fields
                    .iter()
                    .map(|f| (f.name.clone(), f.ty.zeroed()))
                    .collect(),
            }),
            Self::Tuple(elements) => Value::Tuple(elements.iter().map(Self::zeroed).collect()),
            Self::Async {
                kind: AsyncKind::ValueTask,
                result,
            } => Value::Task(TaskValue::completed(
                AsyncKind::ValueTask,
                result.as_deref().map(Self::zeroed),
            )),
            Self::Nullable(_)
            | Self::Reference(_)
            | Self::Array { .. }
            | Self::ByRef(_)
            | Self::Async { .. }
            | Self::Sequence { .. }
            | Self::Generic { .. } => Value::Null,
        }
    }

    /// Empty array value for an array descriptor
    #[must_use]
    pub fn empty_array(&self) -> Option<ArrayValue> {
        match self {
            Self::Array { element, rank } => Some(ArrayValue::empty((**element).clone(), *rank)),
            _ => None,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Void => write!(f, "void"),
            Self::Primitive(p) => write!(f, "{}", p.name()),
            Self::Enum(e) => write!(f, "{}", e.name),
            Self::Struct(s) => write!(f, "{}", s.name),
            Self::Nullable(inner) => write!(f, "{inner}?"),
            Self::Reference(name) => write!(f, "{name}"),
            Self::Array { element, rank } => {
                write!(f, "{element}[{}]", ",".repeat(rank.saturating_sub(1)))
            }
            Self::ByRef(inner) => write!(f, "ref {inner}"),
            Self::Async { kind, result } => match result {
                Some(result) => write!(f, "{}<{result}>", kind.name()),
                None => write!(f, "{}", kind.name()),
            },
            Self::Sequence { kind, element } => match element {
                Some(element) => write!(f, "{}<{element}>", kind.name()),
                None => write!(f, "{}", kind.name()),
            },
            Self::Tuple(elements) => {
                write!(f, "(")?;
                write_list(f, elements)?;
                write!(f, ")")
            }
            Self::Generic { name, args } => {
                write!(f, "{name}<")?;
                write_list(f, args)?;
                write!(f, ">")
            }
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[TypeDescriptor]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_zero_values() {
        assert_eq!(TypeDescriptor::I32.zeroed(), Value::I32(0));
        assert_eq!(TypeDescriptor::BOOL.zeroed(), Value::Bool(false));
        assert_eq!(TypeDescriptor::CHAR.zeroed(), Value::Char('\0'));
        assert_eq!(TypeDescriptor::F64.zeroed(), Value::F64(0.0));
    }

    #[test]
    fn enum_zero_is_discriminant_zero() {
        let ty = TypeDescriptor::enumeration("Platform", PrimitiveType::I32);
        match ty.zeroed() {
            Value::Enum(e) => {
                assert_eq!(e.ty, "Platform");
                assert_eq!(e.discriminant, 0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn struct_zero_nulls_reference_fields() {
        let ty = TypeDescriptor::structure(
            "Point",
            [
                ("x", TypeDescriptor::I32),
                ("label", TypeDescriptor::string()),
                ("tags", TypeDescriptor::array_of(TypeDescriptor::string())),
            ],
        );

        let Value::Struct(value) = ty.zeroed() else {
            panic!("expected struct");
        };
        assert_eq!(value.field("x"), Some(&Value::I32(0)));
        assert_eq!(value.field("label"), Some(&Value::Null));
        assert_eq!(value.field("tags"), Some(&Value::Null));
    }

    #[test]
    fn value_type_classification() {
        assert!(TypeDescriptor::I32.is_value_type());
        assert!(TypeDescriptor::nullable(TypeDescriptor::I32).is_value_type());
        assert!(TypeDescriptor::value_task().is_value_type());
        assert!(!TypeDescriptor::task().is_value_type());
        assert!(!TypeDescriptor::object().is_value_type());
        assert!(!TypeDescriptor::array_of(TypeDescriptor::I32).is_value_type());
    }

    #[test]
    fn array_rank_never_zero() {
        let ty = TypeDescriptor::array(TypeDescriptor::I32, 0);
        assert!(matches!(ty, TypeDescriptor::Array { rank: 1, .. }));
    }

    #[test]
    fn element_of_ref_strips_one_level() {
        let ty = TypeDescriptor::by_ref(TypeDescriptor::I32);
        assert_eq!(ty.element_of_ref(), &TypeDescriptor::I32);
        assert_eq!(TypeDescriptor::I32.element_of_ref(), &TypeDescriptor::I32);
    }

    #[test]
    fn display_renders_shapes() {
        assert_eq!(
            TypeDescriptor::array(TypeDescriptor::I32, 2).to_string(),
            "i32[,]"
        );
        assert_eq!(
            TypeDescriptor::task_of(TypeDescriptor::BOOL).to_string(),
            "Task<bool>"
        );
        assert_eq!(
            TypeDescriptor::tuple([TypeDescriptor::I32, TypeDescriptor::string()]).to_string(),
            "(i32, string)"
        );
        assert_eq!(
            TypeDescriptor::nullable(TypeDescriptor::I64).to_string(),
            "i64?"
        );
    }

    #[test]
    fn descriptors_serialize_as_data() {
        let ty = TypeDescriptor::enumerable_of(TypeDescriptor::I32);
        let json = serde_json::to_string(&ty).unwrap();
        let back: TypeDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ty);
    }
}

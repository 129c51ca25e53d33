//! Bridging between Rust types and the dynamic model
//!
//! [`Reflect`] names the descriptor of a Rust type so generic registration
//! and lookup work without spelling descriptors by hand. [`FromValue`] and
//! [`IntoValue`] convert at the typed call-site boundary.
//!
//! Reference types default to `Null`, so they reflect only through `Option`:
//! `Option<String>` and `Option<ObjectRef>` have descriptors, bare `String`
//! and `ObjectRef` do not.

use crate::descriptor::{TypeDescriptor, OBJECT_TYPE_NAME};
use crate::error::ValueError;
use crate::value::{ArrayValue, EnumValue, ObjectRef, SequenceValue, TaskValue, Value};

/// Rust types with a known [`TypeDescriptor`]
pub trait Reflect {
    /// Descriptor for this type
    fn descriptor() -> TypeDescriptor;
}

/// Conversion out of a dynamic [`Value`]
pub trait FromValue: Sized {
    /// Convert, failing if the value is not assignable to `Self`
    ///
    /// # Errors
    /// Returns [`ValueError::TypeMismatch`] when the value has a different kind
    fn from_value(value: Value) -> Result<Self, ValueError>;
}

/// Conversion into a dynamic [`Value`]
pub trait IntoValue {
    /// Convert into a value
    fn into_value(self) -> Value;
}

macro_rules! primitive {
    ($($ty:ty => $variant:ident, $desc:ident;)*) => {
        $(
            impl Reflect for $ty {
                fn descriptor() -> TypeDescriptor {
                    TypeDescriptor::Primitive(crate::PrimitiveType::$desc)
                }
            }

            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, ValueError> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(ValueError::mismatch::<Self>(&other)),
                    }
                }
            }

            impl IntoValue for $ty {
                fn into_value(self) -> Value {
                    Value::$variant(self)
                }
            }
        )*
    };
}

primitive! {
    bool => Bool, Bool;
    char => Char, Char;
    i8 => I8, I8;
    i16 => I16, I16;
    i32 => I32, I32;
    i64 => I64, I64;
    u8 => U8, U8;
    u16 => U16, U16;
    u32 => U32, U32;
    u64 => U64, U64;
    f32 => F32, F32;
    f64 => F64, F64;
}

impl Reflect for () {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Void
    }
}

impl FromValue for () {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Unit | Value::Null => Ok(()),
            other => Err(ValueError::mismatch::<Self>(&other)),
        }
    }
}

impl IntoValue for () {
    fn into_value(self) -> Value {
        Value::Unit
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(ValueError::mismatch::<Self>(&other)),
        }
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::String(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::String(self.to_string())
    }
}

impl FromValue for ObjectRef {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Object(o) => Ok(o),
            other => Err(ValueError::mismatch::<Self>(&other)),
        }
    }
}

impl IntoValue for ObjectRef {
    fn into_value(self) -> Value {
        Value::Object(self)
    }
}

// `Value` passes through untouched; its descriptor is the universal reference.
impl Reflect for Value {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::object()
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        Ok(value)
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl FromValue for EnumValue {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Enum(e) => Ok(e),
            other => Err(ValueError::mismatch::<Self>(&other)),
        }
    }
}

impl FromValue for ArrayValue {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Array(a) => Ok(a),
            other => Err(ValueError::mismatch::<Self>(&other)),
        }
    }
}

impl FromValue for TaskValue {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Task(t) => Ok(t),
            other => Err(ValueError::mismatch::<Self>(&other)),
        }
    }
}

impl FromValue for SequenceValue {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Sequence(s) => Ok(s),
            other => Err(ValueError::mismatch::<Self>(&other)),
        }
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn descriptor() -> TypeDescriptor {
        let inner = T::descriptor();
        // Reference shapes are already nullable.
        if inner.is_value_type() {
            TypeDescriptor::nullable(inner)
        } else {
            inner
        }
    }
}

impl Reflect for Option<String> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::string()
    }
}

impl Reflect for Option<ObjectRef> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Reference(OBJECT_TYPE_NAME.to_string())
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        self.map_or(Value::Null, IntoValue::into_value)
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::array_of(T::descriptor())
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Array(array) if array.rank() == 1 => {
                array.into_items().into_iter().map(T::from_value).collect()
            }
            Value::Sequence(sequence) => sequence.iter().cloned().map(T::from_value).collect(),
            other => Err(ValueError::mismatch::<Self>(&other)),
        }
    }
}

impl<T: Reflect + IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::Array(ArrayValue::from_vec(
            T::descriptor(),
            self.into_iter().map(IntoValue::into_value).collect(),
        ))
    }
}

macro_rules! tuple {
    ($len:expr => $($name:ident),+) => {
        impl<$($name: Reflect),+> Reflect for ($($name,)+) {
            fn descriptor() -> TypeDescriptor {
                TypeDescriptor::Tuple(vec![$($name::descriptor()),+])
            }
        }

        impl<$($name: FromValue),+> FromValue for ($($name,)+) {
            fn from_value(value: Value) -> Result<Self, ValueError> {
                match value {
                    Value::Tuple(items) => {
                        if items.len() != $len {
                            return Err(ValueError::LengthMismatch {
                                expected: $len,
                                found: items.len(),
                            });
                        }
                        let mut items = items.into_iter();
                        Ok(($(
                            $name::from_value(items.next().unwrap_or_default())?,
                        )+))
                    }
                    other => Err(ValueError::mismatch::<Self>(&other)),
                }
            }
        }

        impl<$($name: IntoValue),+> IntoValue for ($($name,)+) {
            #[allow(non_snake_case)]
            fn into_value(self) -> Value {
                let ($($name,)+) = self;
                Value::Tuple(vec![$($name.into_value()),+])
            }
        }
    };
}

tuple!(1 => A);
tuple!(2 => A, B);
tuple!(3 => A, B, C);
tuple!(4 => A, B, C, D);
tuple!(5 => A, B, C, D, E);
tuple!(6 => A, B, C, D, E, F);

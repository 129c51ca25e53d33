//! Surrogate Types
//!
//! Language-neutral descriptions of requested type shapes and the dynamic
//! values that flow through a behavior pipeline.
//!
//! # Core Concepts
//!
//! - [`TypeDescriptor`]: Closed classification of a type shape
//! - [`Value`]: Dynamic value produced by behaviors and the default engine
//! - [`Reflect`]: Maps a Rust type onto its [`TypeDescriptor`]
//! - [`FromValue`] / [`IntoValue`]: Typed conversion at the call-site boundary
//!
//! # Example
//!
//! ```rust,ignore
//! use surrogate_types::{Reflect, TypeDescriptor, Value};
//!
//! let ty = <Vec<i32>>::descriptor();
//! assert_eq!(ty, TypeDescriptor::array_of(TypeDescriptor::I32));
//! assert_eq!(TypeDescriptor::I32.zeroed(), Value::I32(0));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod descriptor;
mod error;
mod reflect;
mod value;

// Re-exports
pub use descriptor::{
    AsyncKind, EnumType, FieldDescriptor, PrimitiveType, SequenceKind, StructType,
    TypeDescriptor, OBJECT_TYPE_NAME, STRING_TYPE_NAME,
};
pub use error::ValueError;
pub use reflect::{FromValue, IntoValue, Reflect};
pub use value::{ArrayValue, EnumValue, ObjectRef, SequenceValue, StructValue, TaskValue, Value};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

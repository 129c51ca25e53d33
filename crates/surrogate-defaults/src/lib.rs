//! Surrogate Defaults
//!
//! Manufactures a safe placeholder value for any requested type shape when
//! no behavior supplies a real one.
//!
//! # Core Concepts
//!
//! - [`DefaultValueProvider`]: Per-instance override registry plus the
//!   recursive synthesis rules
//! - [`TypeKey`]: Registry key, either an exact descriptor or an
//!   [`OpenShape`] matching any closing type arguments
//!
//! # Example
//!
//! ```rust,ignore
//! use surrogate_defaults::DefaultValueProvider;
//! use surrogate_types::{TypeDescriptor, Value};
//!
//! let mut provider = DefaultValueProvider::new();
//! assert_eq!(provider.get_default(&TypeDescriptor::I32), Value::I32(0));
//!
//! provider.register_for::<i32>(|| 42);
//! assert_eq!(provider.get_default_for::<i32>(), Value::I32(42));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod key;
mod provider;

// Re-exports
pub use key::{OpenShape, TypeKey};
pub use provider::{DefaultValueProvider, Factory};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Surrogate Pipeline
//!
//! Runtime dispatch core for substitute implementations: each call on a
//! substitute becomes a [`MethodInvocation`] that walks an ordered chain of
//! [`Behavior`]s until one of them produces a [`MethodReturn`].
//!
//! # Core Concepts
//!
//! - [`MethodDescriptor`] / [`CallSite`]: Static description of a member
//! - [`MethodInvocation`]: One call's target, method and argument slots
//! - [`MethodReturn`]: Return value, ref/out outputs, optional fault
//! - [`Behavior`] / [`Next`]: Pluggable unit plus the rest-of-chain continuation
//! - [`BehaviorPipeline`]: Ordered chain ending in [`DefaultValueBehavior`]
//!
//! # Example
//!
//! ```rust,ignore
//! use surrogate_pipeline::{Argument, BehaviorPipeline, MethodDescriptor, MethodInvocation};
//! use surrogate_types::TypeDescriptor;
//! use std::sync::Arc;
//!
//! let method = Arc::new(
//!     MethodDescriptor::builder("Values")
//!         .returns(TypeDescriptor::array_of(TypeDescriptor::I32))
//!         .build()?,
//! );
//!
//! let pipeline = BehaviorPipeline::new();
//! let mut invocation = MethodInvocation::create(&target, method, [])?;
//! let values: Vec<i32> = pipeline.execute_as(&mut invocation)?;
//! assert!(values.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod behavior;
mod behaviors;
mod config;
mod error;
mod invocation;
mod method;
mod method_return;
mod pipeline;

// Re-exports
pub use behavior::{Behavior, Next};
pub use behaviors::{AnonymousBehavior, DefaultValueBehavior, RecordedCall, RecordingBehavior};
pub use config::{PipelineConfig, RefArgumentPolicy};
pub use error::{ExecuteError, InvocationError, OutputError, PipelineError};
pub use invocation::{Argument, MethodInvocation};
pub use method::{
    CallSite, MethodDescriptor, MethodDescriptorBuilder, MethodKind, ParameterDescriptor,
    ParameterMode,
};
pub use method_return::{Fault, MethodReturn, Outputs, RefReturn};
pub use pipeline::{BehaviorPipeline, Surrogate};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

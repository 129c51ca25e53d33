//! Built-in behaviors
//!
//! - [`DefaultValueBehavior`]: Chain terminator synthesizing placeholder returns
//! - [`AnonymousBehavior`]: Closure-backed behavior for ad-hoc stubbing
//! - [`RecordingBehavior`]: Decorator keeping a log of every call it sees

mod anonymous;
mod default_value;
mod recording;

pub use anonymous::AnonymousBehavior;
pub use default_value::DefaultValueBehavior;
pub use recording::{RecordedCall, RecordingBehavior};

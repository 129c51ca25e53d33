//! Closure-backed behavior

use crate::behavior::{Behavior, Next};
use crate::invocation::MethodInvocation;
use crate::method_return::MethodReturn;
use std::fmt;

type ExecuteFn = dyn Fn(&mut MethodInvocation<'_>, Next<'_>) -> MethodReturn + Send + Sync;
type AppliesFn = dyn Fn(&MethodInvocation<'_>) -> bool + Send + Sync;

/// Behavior built from a closure
///
/// ```rust,ignore
/// // Stub every `Count` call with 42, delegate the rest.
/// let stub = AnonymousBehavior::new(|invocation, _next| invocation.create_value_return(42))
///     .when(|invocation| invocation.method().name() == "Count")
///     .named("count-stub");
/// pipeline.add(stub);
/// ```
pub struct AnonymousBehavior {
    name: &'static str,
    execute: Box<ExecuteFn>,
    applies: Option<Box<AppliesFn>>,
}

impl AnonymousBehavior {
    /// Create behavior that applies to every invocation
    #[must_use]
    pub fn new<F>(execute: F) -> Self
    where
        F: Fn(&mut MethodInvocation<'_>, Next<'_>) -> MethodReturn + Send + Sync + 'static,
    {
        Self {
            name: "AnonymousBehavior",
            execute: Box::new(execute),
            applies: None,
        }
    }

    /// Restrict to invocations matching `predicate`
    #[must_use]
    pub fn when<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&MethodInvocation<'_>) -> bool + Send + Sync + 'static,
    {
        self.applies = Some(Box::new(predicate));
        self
    }

    /// Set the name reported in traces
    #[inline]
    #[must_use]
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

impl Behavior for AnonymousBehavior {
    fn applies_to(&self, invocation: &MethodInvocation<'_>) -> bool {
        self.applies.as_ref().map_or(true, |applies| applies(invocation))
    }

    fn execute(&self, invocation: &mut MethodInvocation<'_>, next: Next<'_>) -> MethodReturn {
        (self.execute)(invocation, next)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for AnonymousBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnonymousBehavior")
            .field("name", &self.name)
            .field("conditional", &self.applies.is_some())
            .finish_non_exhaustive()
    }
}

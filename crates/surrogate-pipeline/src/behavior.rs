//! Behavior trait and chain continuation
//!
//! Provides the [`Behavior`] trait for pluggable call handling and [`Next`],
//! the by-value continuation standing for "the rest of the chain".

use crate::invocation::MethodInvocation;
use crate::method_return::MethodReturn;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Pluggable unit deciding how (or whether) to satisfy an invocation
///
/// # Contract
/// A behavior that never runs `next` short-circuits the chain. One that runs
/// `next` and inspects the result decorates it. Either way `execute` must
/// yield a [`MethodReturn`]; errors travel as a [`crate::Fault`] inside it.
pub trait Behavior: Any + Send + Sync + fmt::Debug {
    /// Check if this behavior wants to see the invocation
    ///
    /// Behaviors that do not apply are skipped without consuming `next`.
    fn applies_to(&self, invocation: &MethodInvocation<'_>) -> bool {
        let _ = invocation;
        true
    }

    /// Satisfy the invocation or delegate to the rest of the chain
    ///
    /// # Returns
    /// The return for this call, from this behavior or from `next.run(..)`
    fn execute(&self, invocation: &mut MethodInvocation<'_>, next: Next<'_>) -> MethodReturn;

    /// Behavior name (for tracing)
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Rest of the chain after the current behavior
///
/// Holds the behaviors still to visit plus the terminal. Running it consumes
/// it, so a behavior can advance the chain at most once and never backwards.
#[must_use = "dropping `Next` short-circuits the chain"]
pub struct Next<'a> {
    behaviors: &'a [Arc<dyn Behavior>],
    terminal: Option<&'a dyn Behavior>,
}

impl<'a> Next<'a> {
    pub(crate) fn new(behaviors: &'a [Arc<dyn Behavior>], terminal: &'a dyn Behavior) -> Self {
        Self {
            behaviors,
            terminal: Some(terminal),
        }
    }

    /// Continuation past the end of the chain
    ///
    /// Running it yields a successful return with no value and the current
    /// outputs. This is what the terminal receives.
    pub fn end() -> Self {
        Self {
            behaviors: &[],
            terminal: None,
        }
    }

    /// Number of behaviors still ahead, not counting the terminal
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.behaviors.len()
    }

    /// Run the rest of the chain
    pub fn run(self, invocation: &mut MethodInvocation<'_>) -> MethodReturn {
        let mut rest = self.behaviors;

        while let Some((behavior, tail)) = rest.split_first() {
            if behavior.applies_to(invocation) {
                tracing::trace!(
                    behavior = behavior.name(),
                    method = invocation.method().name(),
                    "executing behavior"
                );
                let next = Next {
                    behaviors: tail,
                    terminal: self.terminal,
                };
                return behavior.execute(invocation, next);
            }

            tracing::trace!(
                behavior = behavior.name(),
                method = invocation.method().name(),
                "behavior does not apply"
            );
            rest = tail;
        }

        match self.terminal {
            Some(terminal) => {
                tracing::debug!(
                    behavior = terminal.name(),
                    method = invocation.method().name(),
                    "reached terminal behavior"
                );
                terminal.execute(invocation, Next::end())
            }
            None => invocation.create_void_return(),
        }
    }
}

impl fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("remaining", &self.behaviors.len())
            .field("terminal", &self.terminal.map(|terminal| terminal.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::MethodDescriptor;
    use surrogate_types::{TypeDescriptor, Value};

    #[derive(Debug)]
    struct Fixed(i32);

    impl Behavior for Fixed {
        fn execute(&self, invocation: &mut MethodInvocation<'_>, _next: Next<'_>) -> MethodReturn {
            invocation.create_value_return(self.0)
        }
    }

    #[derive(Debug)]
    struct Never;

    impl Behavior for Never {
        fn applies_to(&self, _invocation: &MethodInvocation<'_>) -> bool {
            false
        }

        fn execute(&self, _invocation: &mut MethodInvocation<'_>, _next: Next<'_>) -> MethodReturn {
            unreachable!("never applies")
        }
    }

    fn invocation() -> MethodInvocation<'static> {
        let method = MethodDescriptor::builder("Get")
            .returns(TypeDescriptor::I32)
            .build()
            .unwrap();
        MethodInvocation::create(&(), Arc::new(method), []).unwrap()
    }

    #[test]
    fn end_yields_void_return() {
        let mut invocation = invocation();
        let ret = Next::end().run(&mut invocation);
        assert!(!ret.is_faulted());
        assert_eq!(ret.return_value(), None);
    }

    #[test]
    fn skips_behaviors_that_do_not_apply() {
        let chain: Vec<Arc<dyn Behavior>> = vec![Arc::new(Never), Arc::new(Fixed(3))];
        let terminal = Fixed(0);
        let mut invocation = invocation();

        let ret = Next::new(&chain, &terminal).run(&mut invocation);
        assert_eq!(ret.return_value(), Some(&Value::I32(3)));
    }

    #[test]
    fn empty_chain_reaches_terminal() {
        let terminal = Fixed(9);
        let mut invocation = invocation();

        let next = Next::new(&[], &terminal);
        assert_eq!(next.remaining(), 0);
        assert_eq!(next.run(&mut invocation).return_value(), Some(&Value::I32(9)));
    }

    #[test]
    fn default_name_is_type_name() {
        assert!(Fixed(0).name().ends_with("Fixed"));
    }
}

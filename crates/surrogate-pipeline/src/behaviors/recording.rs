//! Call recording decorator

use crate::behavior::{Behavior, Next};
use crate::invocation::MethodInvocation;
use crate::method_return::MethodReturn;
use parking_lot::Mutex;
use surrogate_types::Value;

/// One call seen by a [`RecordingBehavior`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Method name
    pub method: String,
    /// Argument slots as they were when the call entered the behavior
    pub arguments: Vec<Value>,
    /// Return value produced further down the chain
    pub return_value: Option<Value>,
    /// Whether the return carried a fault
    pub faulted: bool,
}

/// Decorator that records every invocation, then delegates
#[derive(Debug, Default)]
pub struct RecordingBehavior {
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingBehavior {
    /// Create recorder with an empty log
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the recorded calls, oldest first
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Number of recorded calls
    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }

    /// Check if nothing was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }

    /// Drop every recorded call
    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

impl Behavior for RecordingBehavior {
    fn execute(&self, invocation: &mut MethodInvocation<'_>, next: Next<'_>) -> MethodReturn {
        let method = invocation.method().name().to_string();
        let arguments = invocation.arguments().to_vec();

        let ret = next.run(invocation);

        self.calls.lock().push(RecordedCall {
            method,
            arguments,
            return_value: ret.return_value().cloned(),
            faulted: ret.is_faulted(),
        });
        ret
    }

    fn name(&self) -> &'static str {
        "RecordingBehavior"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invocation::Argument;
    use crate::method::MethodDescriptor;
    use std::sync::Arc;
    use surrogate_types::TypeDescriptor;

    #[test]
    fn records_arguments_and_result() {
        let recorder = RecordingBehavior::new();
        let method = MethodDescriptor::builder("Add")
            .param("a", TypeDescriptor::I32)
            .returns(TypeDescriptor::I32)
            .build()
            .unwrap();
        let mut invocation =
            MethodInvocation::create(&(), Arc::new(method), [Argument::value(2)]).unwrap();

        let _ = recorder.execute(&mut invocation, Next::end());

        let calls = recorder.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, "Add");
        assert_eq!(calls[0].arguments, vec![Value::I32(2)]);
        assert!(!calls[0].faulted);

        recorder.clear();
        assert!(recorder.is_empty());
    }
}

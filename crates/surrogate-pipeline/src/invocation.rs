//! Method invocations
//!
//! A [`MethodInvocation`] is created once per call on a substitute. It
//! borrows the target, shares the method descriptor, and owns the argument
//! slots. Behaviors read the slots and may overwrite `ref`/`out` positions;
//! whatever the slots hold when a return is built becomes the outputs.

use crate::error::InvocationError;
use crate::method::{CallSite, MethodDescriptor, ParameterDescriptor, ParameterMode};
use crate::method_return::{Fault, MethodReturn, Outputs};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use surrogate_types::{IntoValue, Value};

/// Argument as supplied by the caller
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// By-value argument
    In(Value),
    /// `ref` argument with the caller's current value
    Ref(Value),
    /// `out` argument; the callee must assign it
    Out,
}

impl Argument {
    /// By-value argument
    #[inline]
    #[must_use]
    pub fn value(value: impl IntoValue) -> Self {
        Self::In(value.into_value())
    }

    /// `ref` argument
    #[inline]
    #[must_use]
    pub fn by_ref(value: impl IntoValue) -> Self {
        Self::Ref(value.into_value())
    }

    /// Passing mode of this argument
    #[inline]
    #[must_use]
    pub fn mode(&self) -> ParameterMode {
        match self {
            Self::In(_) => ParameterMode::In,
            Self::Ref(_) => ParameterMode::Ref,
            Self::Out => ParameterMode::Out,
        }
    }

    fn into_slot(self) -> Value {
        match self {
            Self::In(value) | Self::Ref(value) => value,
            Self::Out => Value::Null,
        }
    }
}

/// One call on a substitute
pub struct MethodInvocation<'a> {
    target: &'a dyn Any,
    method: Arc<MethodDescriptor>,
    arguments: Vec<Value>,
}

impl<'a> MethodInvocation<'a> {
    /// Create invocation, validating arguments against the descriptor
    ///
    /// `out` slots start as `Null`.
    ///
    /// # Errors
    /// - [`InvocationError::ArityMismatch`] if the argument count differs
    /// - [`InvocationError::ModeMismatch`] if an argument's mode differs from its parameter
    pub fn create(
        target: &'a dyn Any,
        method: Arc<MethodDescriptor>,
        arguments: impl IntoIterator<Item = Argument>,
    ) -> Result<Self, InvocationError> {
        let arguments: Vec<Argument> = arguments.into_iter().collect();

        if arguments.len() != method.arity() {
            return Err(InvocationError::ArityMismatch {
                method: method.name().to_string(),
                expected: method.arity(),
                found: arguments.len(),
            });
        }

        for (parameter, argument) in method.parameters().iter().zip(&arguments) {
            if parameter.mode != argument.mode() {
                return Err(InvocationError::ModeMismatch {
                    method: method.name().to_string(),
                    parameter: parameter.name.clone(),
                    expected: parameter.mode,
                    found: argument.mode(),
                });
            }
        }

        Ok(Self {
            target,
            method,
            arguments: arguments.into_iter().map(Argument::into_slot).collect(),
        })
    }

    /// Create invocation for the member described by `site`
    ///
    /// # Errors
    /// Returns the descriptor build error, or any error of [`Self::create`]
    pub fn at(
        target: &'a dyn Any,
        site: &CallSite,
        arguments: impl IntoIterator<Item = Argument>,
    ) -> Result<Self, InvocationError> {
        Self::create(target, site.descriptor()?, arguments)
    }

    /// Object the call was made on
    #[inline]
    #[must_use]
    pub fn target(&self) -> &'a dyn Any {
        self.target
    }

    /// Target as a concrete type
    #[inline]
    #[must_use]
    pub fn target_as<T: Any>(&self) -> Option<&'a T> {
        self.target.downcast_ref::<T>()
    }

    /// Member being invoked
    #[inline]
    #[must_use]
    pub fn method(&self) -> &MethodDescriptor {
        &self.method
    }

    /// Shared handle to the member descriptor
    #[inline]
    #[must_use]
    pub fn method_arc(&self) -> &Arc<MethodDescriptor> {
        &self.method
    }

    /// Current argument slots in declaration order
    #[inline]
    #[must_use]
    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    /// Current value of argument `index`
    ///
    /// # Errors
    /// Returns [`InvocationError::ArgumentOutOfRange`] past the last parameter
    pub fn argument(&self, index: usize) -> Result<&Value, InvocationError> {
        self.arguments
            .get(index)
            .ok_or_else(|| self.out_of_range(index))
    }

    /// Current value of the argument named `name`
    ///
    /// # Errors
    /// Returns [`InvocationError::UnknownParameter`] if no parameter has that name
    pub fn argument_by_name(&self, name: &str) -> Result<&Value, InvocationError> {
        let parameter = self.parameter_named(name)?;
        self.argument(parameter.position)
    }

    /// Overwrite a `ref`/`out` slot
    ///
    /// # Errors
    /// - [`InvocationError::ArgumentOutOfRange`] past the last parameter
    /// - [`InvocationError::ReadOnlyArgument`] for a by-value parameter
    pub fn set_argument(&mut self, index: usize, value: impl IntoValue) -> Result<(), InvocationError> {
        let parameter = self
            .method
            .parameters()
            .get(index)
            .ok_or_else(|| self.out_of_range(index))?;

        if !parameter.is_by_ref() {
            return Err(InvocationError::ReadOnlyArgument {
                method: self.method.name().to_string(),
                parameter: parameter.name.clone(),
            });
        }

        self.write_slot(index, value.into_value());
        Ok(())
    }

    /// Overwrite the `ref`/`out` slot named `name`
    ///
    /// # Errors
    /// - [`InvocationError::UnknownParameter`] if no parameter has that name
    /// - [`InvocationError::ReadOnlyArgument`] for a by-value parameter
    pub fn set_argument_by_name(&mut self, name: &str, value: impl IntoValue) -> Result<(), InvocationError> {
        let position = self.parameter_named(name)?.position;
        self.set_argument(position, value)
    }

    /// Successful return carrying `value` and the current outputs
    ///
    /// The value is dropped for void methods and constructors.
    #[must_use]
    pub fn create_value_return(&self, value: impl IntoValue) -> MethodReturn {
        let value = self.method.return_type().map(|_| value.into_value());
        MethodReturn::value(value, self.outputs())
    }

    /// Successful return with no value and the current outputs
    #[must_use]
    pub fn create_void_return(&self) -> MethodReturn {
        MethodReturn::value(None, self.outputs())
    }

    /// Faulted return carrying `fault` and the current outputs
    #[must_use]
    pub fn create_fault_return(&self, fault: impl Into<Fault>) -> MethodReturn {
        MethodReturn::faulted(fault.into(), self.outputs())
    }

    /// Current values of every `ref`/`out` slot, in declaration order
    #[must_use]
    pub fn outputs(&self) -> Outputs {
        let mut outputs = Outputs::new();
        for parameter in self.method.parameters().iter().filter(|p| p.is_by_ref()) {
            let value = self
                .arguments
                .get(parameter.position)
                .cloned()
                .unwrap_or_default();
            outputs.insert(parameter.name.clone(), value);
        }
        outputs
    }

    // Slot writes from inside the crate; positions come from the descriptor.
    pub(crate) fn write_slot(&mut self, index: usize, value: Value) {
        if let Some(slot) = self.arguments.get_mut(index) {
            *slot = value;
        }
    }

    fn parameter_named(&self, name: &str) -> Result<&ParameterDescriptor, InvocationError> {
        self.method
            .parameter(name)
            .ok_or_else(|| InvocationError::UnknownParameter {
                method: self.method.name().to_string(),
                name: name.to_string(),
            })
    }

    fn out_of_range(&self, index: usize) -> InvocationError {
        InvocationError::ArgumentOutOfRange {
            method: self.method.name().to_string(),
            index,
            arity: self.method.arity(),
        }
    }
}

impl fmt::Debug for MethodInvocation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodInvocation")
            .field("method", &self.method.name())
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for MethodInvocation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.method)
    }
}

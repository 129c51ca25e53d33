//! Method returns
//!
//! A [`MethodReturn`] is the outcome of one dispatch: either a successful
//! return value or a [`Fault`], plus the final values of every `ref`/`out`
//! slot in declaration order.

use crate::error::OutputError;
use indexmap::IndexMap;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use surrogate_types::{FromValue, Value, ValueError};

/// Error a behavior chose to surface instead of a return value
///
/// Shared behind an `Arc` so returns stay cloneable. Equality is identity.
#[derive(Clone)]
pub struct Fault(Arc<anyhow::Error>);

impl Fault {
    /// Wrap an error value
    #[inline]
    #[must_use]
    pub fn new<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self(Arc::new(anyhow::Error::new(error)))
    }

    /// Fault from a message
    #[inline]
    #[must_use]
    pub fn msg<M>(message: M) -> Self
    where
        M: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        Self(Arc::new(anyhow::Error::msg(message)))
    }

    /// Borrow the underlying error
    #[inline]
    #[must_use]
    pub fn error(&self) -> &anyhow::Error {
        &self.0
    }

    /// Downcast to the concrete error type that was raised
    #[inline]
    #[must_use]
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        self.0.downcast_ref::<E>()
    }

    /// Check if both faults are the same raised error
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<anyhow::Error> for Fault {
    fn from(error: anyhow::Error) -> Self {
        Self(Arc::new(error))
    }
}

impl PartialEq for Fault {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

impl std::error::Error for Fault {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        let inner: &(dyn std::error::Error + 'static) = &**self.0;
        inner.source()
    }
}

/// Final values of the `ref`/`out` slots, keyed by parameter name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outputs(IndexMap<String, Value>);

impl Outputs {
    /// Create empty outputs
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }

    /// Number of outputs
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the method had no `ref`/`out` parameters
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Output at `index`, counting only `ref`/`out` parameters
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get_index(index).map(|(_, value)| value)
    }

    /// Output for parameter `name`
    #[inline]
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Typed output for parameter `name`; `Null` yields `None`
    ///
    /// # Errors
    /// - [`OutputError::NotFound`] if there is no such output
    /// - [`OutputError::TypeMismatch`] if the value is not assignable to `T`
    pub fn get_nullable<T: FromValue>(&self, name: &str) -> Result<Option<T>, OutputError> {
        let value = self.0.get(name).ok_or_else(|| OutputError::NotFound {
            name: name.to_string(),
        })?;

        if value.is_null() {
            return Ok(None);
        }

        T::from_value(value.clone())
            .map(Some)
            .map_err(|source| OutputError::TypeMismatch {
                name: name.to_string(),
                source,
            })
    }

    /// Output names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterate `(name, value)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// Outcome of dispatching one invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodReturn {
    return_value: Option<Value>,
    outputs: Outputs,
    fault: Option<Fault>,
}

impl MethodReturn {
    /// Successful return
    #[inline]
    #[must_use]
    pub fn value(return_value: Option<Value>, outputs: Outputs) -> Self {
        Self {
            return_value,
            outputs,
            fault: None,
        }
    }

    /// Faulted return
    #[inline]
    #[must_use]
    pub fn faulted(fault: Fault, outputs: Outputs) -> Self {
        Self {
            return_value: None,
            outputs,
            fault: Some(fault),
        }
    }

    /// Return value; `None` for void methods, constructors and faults
    #[inline]
    #[must_use]
    pub fn return_value(&self) -> Option<&Value> {
        self.return_value.as_ref()
    }

    /// Take the return value out
    #[inline]
    #[must_use]
    pub fn into_return_value(self) -> Option<Value> {
        self.return_value
    }

    /// Final `ref`/`out` slot values
    #[inline]
    #[must_use]
    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    /// Fault, if a behavior raised one
    #[inline]
    #[must_use]
    pub fn fault(&self) -> Option<&Fault> {
        self.fault.as_ref()
    }

    /// Check if the return carries a fault
    #[inline]
    #[must_use]
    pub fn is_faulted(&self) -> bool {
        self.fault.is_some()
    }

    /// Typed return value
    ///
    /// A missing return value converts as `Null`.
    ///
    /// # Errors
    /// Returns [`ValueError::TypeMismatch`] if the value is not assignable to `T`
    pub fn return_value_as<T: FromValue>(&self) -> Result<T, ValueError> {
        T::from_value(self.return_value.clone().unwrap_or_default())
    }
}

/// Owned slot handed out for by-reference returns
///
/// Writes through the slot are visible to whoever holds it, which is all a
/// substitute can offer for a `ref` return with no backing storage.
#[derive(Debug, Clone, PartialEq)]
pub struct RefReturn<T>(T);

impl<T> RefReturn<T> {
    /// Wrap a value
    #[inline]
    #[must_use]
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Unwrap the slot
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for RefReturn<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for RefReturn<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

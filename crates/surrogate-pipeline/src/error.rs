//! Error types for the dispatch core
//!
//! - Construction errors: invocation does not match its descriptor
//! - Retrieval errors: typed output lookup against a mismatched value
//! - Registration errors: chain edits that name a missing position
//! - Execution errors: a fault or return-type mismatch surfaced to typed callers

use crate::method::ParameterMode;
use crate::method_return::Fault;
use surrogate_types::ValueError;

/// Invocation or descriptor construction errors
///
/// These are usage errors and surface at creation time, never at execution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvocationError {
    /// Wrong number of arguments
    #[error("{method}: expected {expected} arguments, found {found}")]
    ArityMismatch {
        /// Method name
        method: String,
        /// Declared parameter count
        expected: usize,
        /// Supplied argument count
        found: usize,
    },

    /// Argument passing mode differs from the parameter's
    #[error("{method}: parameter `{parameter}` is {expected:?}, argument passed as {found:?}")]
    ModeMismatch {
        /// Method name
        method: String,
        /// Parameter name
        parameter: String,
        /// Declared mode
        expected: ParameterMode,
        /// Supplied mode
        found: ParameterMode,
    },

    /// Two parameters share a name
    #[error("{method}: duplicate parameter `{parameter}`")]
    DuplicateParameter {
        /// Method name
        method: String,
        /// Parameter name
        parameter: String,
    },

    /// Declared position differs from the parameter's index
    #[error("{method}: parameter `{parameter}` declares position {found}, expected {expected}")]
    ParameterPosition {
        /// Method name
        method: String,
        /// Parameter name
        parameter: String,
        /// Index in the parameter list
        expected: usize,
        /// Declared position
        found: usize,
    },

    /// Parameter type disagrees with its passing mode
    #[error("{method}: parameter `{parameter}` is {mode:?} but declared as {ty}")]
    ParameterType {
        /// Method name
        method: String,
        /// Parameter name
        parameter: String,
        /// Declared mode
        mode: ParameterMode,
        /// Declared type
        ty: String,
    },

    /// Constructors cannot declare a return type
    #[error("{method}: constructors have no return value")]
    ConstructorReturn {
        /// Constructor name
        method: String,
    },

    /// No parameter with this name
    #[error("{method}: no parameter named `{name}`")]
    UnknownParameter {
        /// Method name
        method: String,
        /// Requested name
        name: String,
    },

    /// Argument index past the last parameter
    #[error("{method}: argument index {index} out of range (arity {arity})")]
    ArgumentOutOfRange {
        /// Method name
        method: String,
        /// Requested index
        index: usize,
        /// Declared parameter count
        arity: usize,
    },

    /// Attempt to overwrite a by-value argument
    #[error("{method}: parameter `{parameter}` is passed by value and cannot be written")]
    ReadOnlyArgument {
        /// Method name
        method: String,
        /// Parameter name
        parameter: String,
    },
}

/// Output retrieval errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OutputError {
    /// No output with this name
    #[error("no output named `{name}`")]
    NotFound {
        /// Requested name
        name: String,
    },

    /// Stored value is not assignable to the requested type
    #[error("output `{name}`: {source}")]
    TypeMismatch {
        /// Output name
        name: String,
        /// Conversion failure
        #[source]
        source: ValueError,
    },
}

/// Behavior chain editing errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    /// No behavior of the anchor type is in the chain
    #[error("no behavior of type {anchor} in pipeline")]
    AnchorNotFound {
        /// Anchor type name
        anchor: &'static str,
    },

    /// Position past the end of the chain
    #[error("index {index} out of bounds (len {len})")]
    IndexOutOfBounds {
        /// Requested index
        index: usize,
        /// Chain length
        len: usize,
    },
}

/// Errors surfaced by the typed execution entry points
#[derive(Debug, thiserror::Error)]
pub enum ExecuteError {
    /// A behavior produced a fault
    #[error("invocation faulted: {0}")]
    Faulted(#[source] Fault),

    /// Return value not assignable to the requested type
    #[error("return value: {0}")]
    ReturnType(#[from] ValueError),
}

impl ExecuteError {
    /// Fault carried by this error, if any
    #[inline]
    #[must_use]
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            Self::Faulted(fault) => Some(fault),
            Self::ReturnType(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_mismatch_display() {
        let err = InvocationError::ArityMismatch {
            method: "Set".to_string(),
            expected: 1,
            found: 0,
        };
        assert_eq!(err.to_string(), "Set: expected 1 arguments, found 0");
    }

    #[test]
    fn output_mismatch_keeps_source() {
        let err = OutputError::TypeMismatch {
            name: "x".to_string(),
            source: ValueError::LengthMismatch {
                expected: 2,
                found: 1,
            },
        };
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn execute_error_exposes_fault() {
        let err = ExecuteError::Faulted(Fault::msg("boom"));
        assert!(err.fault().is_some());
        assert!(err.to_string().contains("boom"));
    }
}

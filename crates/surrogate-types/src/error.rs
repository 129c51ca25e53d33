//! Error types for value conversion

/// Errors raised while converting a dynamic [`Value`](crate::Value) into a Rust type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    /// Stored value is not assignable to the requested type
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Requested type
        expected: String,
        /// Kind of the stored value
        found: &'static str,
    },

    /// Tuple or array did not have the expected number of elements
    #[error("length mismatch: expected {expected} elements, found {found}")]
    LengthMismatch {
        /// Expected element count
        expected: usize,
        /// Actual element count
        found: usize,
    },
}

impl ValueError {
    /// Create type mismatch error for target type `T`
    #[inline]
    #[must_use]
    pub fn mismatch<T: ?Sized>(found: &crate::Value) -> Self {
        Self::TypeMismatch {
            expected: std::any::type_name::<T>().to_string(),
            found: found.kind_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    #[test]
    fn mismatch_names_both_sides() {
        let err = ValueError::mismatch::<i32>(&Value::Bool(true));
        let text = err.to_string();
        assert!(text.contains("i32"));
        assert!(text.contains("bool"));
    }
}

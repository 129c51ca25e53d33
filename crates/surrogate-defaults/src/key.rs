//! Registry keys
//!
//! Overrides are keyed either by an exact descriptor or by an open generic
//! shape. Lookup tries the exact key first, then the shape.

use serde::{Deserialize, Serialize};
use std::fmt;
use surrogate_types::{AsyncKind, SequenceKind, TypeDescriptor};

/// Open generic shape, matching any closing type arguments
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenShape {
    /// Any nullable value type
    Nullable,

    /// Any array of the given rank
    Array {
        /// Number of dimensions
        rank: usize,
    },

    /// Any generic async wrapper of this flavor
    Async(AsyncKind),

    /// Any generic sequence of this flavor
    Sequence(SequenceKind),

    /// Any tuple of this arity
    Tuple {
        /// Number of elements
        arity: usize,
    },

    /// Any instantiation of the named generic type with this arity
    Generic {
        /// Generic type name
        name: String,
        /// Number of type parameters
        arity: usize,
    },
}

impl OpenShape {
    /// Open shape of a closed descriptor, if it is a generic instantiation
    ///
    /// Non-generic async wrappers and sequences have no shape.
    #[must_use]
    pub fn of(ty: &TypeDescriptor) -> Option<Self> {
        match ty {
            TypeDescriptor::Nullable(_) => Some(Self::Nullable),
            TypeDescriptor::Array { rank, .. } => Some(Self::Array { rank: *rank }),
            TypeDescriptor::Async {
                kind,
                result: Some(_),
            } => Some(Self::Async(*kind)),
            TypeDescriptor::Sequence {
                kind,
                element: Some(_),
            } => Some(Self::Sequence(*kind)),
            TypeDescriptor::Tuple(elements) => Some(Self::Tuple {
                arity: elements.len(),
            }),
            TypeDescriptor::Generic { name, args } => Some(Self::Generic {
                name: name.clone(),
                arity: args.len(),
            }),
            TypeDescriptor::Void
            | TypeDescriptor::Primitive(_)
            | TypeDescriptor::Enum(_)
            | TypeDescriptor::Struct(_)
            | TypeDescriptor::Reference(_)
            | TypeDescriptor::ByRef(_)
            | TypeDescriptor::Async { .. }
            | TypeDescriptor::Sequence { .. } => None,
        }
    }

    /// Open generic name shape
    #[inline]
    #[must_use]
    pub fn generic(name: impl Into<String>, arity: usize) -> Self {
        Self::Generic {
            name: name.into(),
            arity,
        }
    }
}

impl fmt::Display for OpenShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nullable => write!(f, "_?"),
            Self::Array { rank } => write!(f, "_[{}]", ",".repeat(rank.saturating_sub(1))),
            Self::Async(kind) => write!(f, "{kind:?}<_>"),
            Self::Sequence(kind) => write!(f, "{kind:?}<_>"),
            Self::Tuple { arity } => write!(f, "({})", vec!["_"; *arity].join(", ")),
            Self::Generic { name, arity } => {
                write!(f, "{name}<{}>", vec!["_"; *arity].join(", "))
            }
        }
    }
}

/// Override registry key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKey {
    /// Matches exactly this descriptor
    Exact(TypeDescriptor),
    /// Matches every closing of this shape
    Open(OpenShape),
}

impl From<TypeDescriptor> for TypeKey {
    fn from(ty: TypeDescriptor) -> Self {
        Self::Exact(ty)
    }
}

impl From<OpenShape> for TypeKey {
    fn from(shape: OpenShape) -> Self {
        Self::Open(shape)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(ty) => write!(f, "{ty}"),
            Self::Open(shape) => write!(f, "{shape}"),
        }
    }
}

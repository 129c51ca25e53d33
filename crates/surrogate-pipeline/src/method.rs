//! Method descriptors
//!
//! A [`MethodDescriptor`] is the static description of a member: its name,
//! kind, ordered parameters with passing modes, and return type. It is
//! immutable once built and shared between invocations through an `Arc`.

use crate::error::InvocationError;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use surrogate_types::TypeDescriptor;

/// Kind of member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    /// Ordinary method (void or value-returning)
    Method,
    /// Constructor (no return slot)
    Constructor,
}

/// Parameter passing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterMode {
    /// Passed by value
    In,
    /// Passed by reference; caller supplies a value, callee may overwrite it
    Ref,
    /// Output only; callee must assign it
    Out,
}

impl ParameterMode {
    /// Check if the slot is written back to the caller
    #[inline]
    #[must_use]
    pub fn is_by_ref(self) -> bool {
        matches!(self, Self::Ref | Self::Out)
    }
}

/// Parameter of a method
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    /// Parameter name
    pub name: String,
    /// Zero-based position
    pub position: usize,
    /// Declared type; a `ByRef` descriptor for `ref`/`out` parameters
    pub ty: TypeDescriptor,
    /// Passing mode
    pub mode: ParameterMode,
}

impl ParameterDescriptor {
    /// Type with by-reference indirection removed
    #[inline]
    #[must_use]
    pub fn element_type(&self) -> &TypeDescriptor {
        self.ty.element_of_ref()
    }

    /// Check if the slot is written back to the caller
    #[inline]
    #[must_use]
    pub fn is_by_ref(&self) -> bool {
        self.mode.is_by_ref()
    }
}

/// Static description of a member
///
/// Deserialization runs the same validation as [`MethodDescriptorBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawMethodDescriptor")]
pub struct MethodDescriptor {
    name: String,
    kind: MethodKind,
    parameters: Vec<ParameterDescriptor>,
    return_type: Option<TypeDescriptor>,
}

impl MethodDescriptor {
    /// Start building a method
    #[inline]
    #[must_use]
    pub fn builder(name: impl Into<String>) -> MethodDescriptorBuilder {
        MethodDescriptorBuilder::new(name.into(), MethodKind::Method)
    }

    /// Start building a constructor
    #[inline]
    #[must_use]
    pub fn constructor(type_name: impl Into<String>) -> MethodDescriptorBuilder {
        MethodDescriptorBuilder::new(type_name.into(), MethodKind::Constructor)
    }

    /// Member name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> MethodKind {
        self.kind
    }

    /// Check if this is a constructor
    #[inline]
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.kind == MethodKind::Constructor
    }

    /// Ordered parameters
    #[inline]
    #[must_use]
    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    /// Number of parameters
    #[inline]
    #[must_use]
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    /// Look up parameter by name
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&ParameterDescriptor> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Return type, `None` for void methods and constructors
    #[inline]
    #[must_use]
    pub fn return_type(&self) -> Option<&TypeDescriptor> {
        self.return_type.as_ref()
    }

    /// Check if the method returns by reference
    #[inline]
    #[must_use]
    pub fn returns_by_ref(&self) -> bool {
        self.return_type.as_ref().is_some_and(TypeDescriptor::is_by_ref)
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.return_type {
            Some(ty) => write!(f, "{ty} ")?,
            None if self.is_constructor() => write!(f, "new ")?,
            None => write!(f, "void ")?,
        }
        write!(f, "{}(", self.name)?;
        for (i, p) in self.parameters.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match p.mode {
                ParameterMode::In | ParameterMode::Ref => write!(f, "{} {}", p.ty, p.name)?,
                ParameterMode::Out => write!(f, "out {} {}", p.element_type(), p.name)?,
            }
        }
        write!(f, ")")
    }
}

/// Builder for [`MethodDescriptor`]
#[derive(Debug, Clone)]
pub struct MethodDescriptorBuilder {
    name: String,
    kind: MethodKind,
    parameters: Vec<ParameterDescriptor>,
    return_type: Option<TypeDescriptor>,
}

impl MethodDescriptorBuilder {
    fn new(name: String, kind: MethodKind) -> Self {
        Self {
            name,
            kind,
            parameters: Vec::new(),
            return_type: None,
        }
    }

    fn push(mut self, name: impl Into<String>, ty: TypeDescriptor, mode: ParameterMode) -> Self {
        let position = self.parameters.len();
        self.parameters.push(ParameterDescriptor {
            name: name.into(),
            position,
            ty,
            mode,
        });
        self
    }

    /// Add by-value parameter
    #[must_use]
    pub fn param(self, name: impl Into<String>, ty: TypeDescriptor) -> Self {
        self.push(name, ty, ParameterMode::In)
    }

    /// Add `ref` parameter of element type `ty`
    #[must_use]
    pub fn ref_param(self, name: impl Into<String>, ty: TypeDescriptor) -> Self {
        self.push(name, TypeDescriptor::by_ref(ty), ParameterMode::Ref)
    }

    /// Add `out` parameter of element type `ty`
    #[must_use]
    pub fn out_param(self, name: impl Into<String>, ty: TypeDescriptor) -> Self {
        self.push(name, TypeDescriptor::by_ref(ty), ParameterMode::Out)
    }

    /// Set return type (`Void` clears it)
    #[must_use]
    pub fn returns(mut self, ty: TypeDescriptor) -> Self {
        self.return_type = if ty.is_void() { None } else { Some(ty) };
        self
    }

    /// Set by-reference return type of element `ty`
    #[must_use]
    pub fn returns_ref(self, ty: TypeDescriptor) -> Self {
        self.returns(TypeDescriptor::by_ref(ty))
    }

    /// Validate and build
    ///
    /// # Errors
    /// - [`InvocationError::DuplicateParameter`] if two parameters share a name
    /// - [`InvocationError::ConstructorReturn`] if a constructor declares a return type
    pub fn build(self) -> Result<MethodDescriptor, InvocationError> {
        if self.kind == MethodKind::Constructor && self.return_type.is_some() {
            return Err(InvocationError::ConstructorReturn { method: self.name });
        }

        let mut seen = HashSet::new();
        for p in &self.parameters {
            if !seen.insert(p.name.as_str()) {
                return Err(InvocationError::DuplicateParameter {
                    method: self.name.clone(),
                    parameter: p.name.clone(),
                });
            }
        }

        Ok(MethodDescriptor {
            name: self.name,
            kind: self.kind,
            parameters: self.parameters,
            return_type: self.return_type,
        })
    }
}

// Wire form of a descriptor; positions are optional and checked when present.
#[derive(Deserialize)]
struct RawMethodDescriptor {
    name: String,
    kind: MethodKind,
    #[serde(default)]
    parameters: Vec<RawParameter>,
    #[serde(default)]
    return_type: Option<TypeDescriptor>,
}

#[derive(Deserialize)]
struct RawParameter {
    name: String,
    #[serde(default)]
    position: Option<usize>,
    ty: TypeDescriptor,
    mode: ParameterMode,
}

impl TryFrom<RawMethodDescriptor> for MethodDescriptor {
    type Error = InvocationError;

    fn try_from(raw: RawMethodDescriptor) -> Result<Self, Self::Error> {
        let mut builder = MethodDescriptorBuilder::new(raw.name, raw.kind);

        for (index, p) in raw.parameters.into_iter().enumerate() {
            if let Some(found) = p.position.filter(|&found| found != index) {
                return Err(InvocationError::ParameterPosition {
                    method: builder.name,
                    parameter: p.name,
                    expected: index,
                    found,
                });
            }
            if p.mode.is_by_ref() != p.ty.is_by_ref() {
                return Err(InvocationError::ParameterType {
                    method: builder.name,
                    parameter: p.name,
                    mode: p.mode,
                    ty: p.ty.to_string(),
                });
            }
            builder = builder.push(p.name, p.ty, p.mode);
        }

        if let Some(ty) = raw.return_type {
            builder = builder.returns(ty);
        }
        builder.build()
    }
}

/// Lazily built descriptor for "the method currently executing"
///
/// Generated bodies keep one `static` per member and create invocations from
/// it, so the descriptor is described once and shared by every call.
///
/// ```rust,ignore
/// static VALUES: CallSite = CallSite::new(|| {
///     MethodDescriptor::builder("Values")
///         .returns(TypeDescriptor::array_of(TypeDescriptor::I32))
///         .build()
/// });
///
/// let mut invocation = MethodInvocation::at(self, &VALUES, [])?;
/// ```
pub struct CallSite {
    init: fn() -> Result<MethodDescriptor, InvocationError>,
    descriptor: OnceCell<Result<Arc<MethodDescriptor>, InvocationError>>,
}

impl CallSite {
    /// Create call site from a descriptor constructor
    #[inline]
    #[must_use]
    pub const fn new(init: fn() -> Result<MethodDescriptor, InvocationError>) -> Self {
        Self {
            init,
            descriptor: OnceCell::new(),
        }
    }

    /// Shared descriptor, built on first use
    ///
    /// # Errors
    /// Returns the build error of the descriptor constructor (cached)
    pub fn descriptor(&self) -> Result<Arc<MethodDescriptor>, InvocationError> {
        self.descriptor
            .get_or_init(|| (self.init)().map(Arc::new))
            .clone()
    }
}

impl fmt::Debug for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallSite")
            .field("descriptor", &self.descriptor.get())
            .finish_non_exhaustive()
    }
}

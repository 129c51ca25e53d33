//! Behavior pipeline
//!
//! [`BehaviorPipeline`] owns the ordered behavior chain and the terminal
//! [`DefaultValueBehavior`]. Every dispatch walks the chain front to back and
//! falls through to the terminal, so any well-formed invocation yields a
//! [`MethodReturn`].
//!
//! # Concurrency
//! Editing the chain takes `&mut self`, dispatch takes `&self`. Configure the
//! pipeline before sharing it, or put it behind a lock that serializes edits
//! against dispatch.

use crate::behavior::{Behavior, Next};
use crate::behaviors::DefaultValueBehavior;
use crate::config::PipelineConfig;
use crate::error::{ExecuteError, PipelineError};
use crate::invocation::MethodInvocation;
use crate::method_return::{MethodReturn, RefReturn};
use std::any::{Any, TypeId};
use std::sync::Arc;
use surrogate_defaults::DefaultValueProvider;
use surrogate_types::FromValue;

/// Ordered behavior chain with a default-value terminal
#[derive(Debug, Clone, Default)]
pub struct BehaviorPipeline {
    behaviors: Vec<Arc<dyn Behavior>>,
    terminal: DefaultValueBehavior,
}

impl BehaviorPipeline {
    /// Create pipeline with an empty chain and an empty provider
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create pipeline with configuration
    #[must_use]
    pub fn with_config(config: &PipelineConfig) -> Self {
        Self {
            behaviors: Vec::new(),
            terminal: DefaultValueBehavior::new().configured(config),
        }
    }

    /// Create pipeline whose terminal uses `provider`
    #[must_use]
    pub fn with_provider(provider: DefaultValueProvider) -> Self {
        Self {
            behaviors: Vec::new(),
            terminal: DefaultValueBehavior::with_provider(provider),
        }
    }

    /// Apply configuration to an existing pipeline
    pub fn configure(&mut self, config: &PipelineConfig) {
        self.terminal.set_ref_arguments(config.ref_arguments);
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Append a behavior to the end of the chain
    pub fn add(&mut self, behavior: impl Behavior) -> &mut Self {
        self.add_shared(Arc::new(behavior))
    }

    /// Append a shared behavior to the end of the chain
    pub fn add_shared(&mut self, behavior: Arc<dyn Behavior>) -> &mut Self {
        tracing::debug!(behavior = behavior.name(), position = self.behaviors.len(), "added behavior");
        self.behaviors.push(behavior);
        self
    }

    /// Insert a behavior at `index`
    ///
    /// # Errors
    /// Returns [`PipelineError::IndexOutOfBounds`] if `index > len`
    pub fn insert(&mut self, index: usize, behavior: impl Behavior) -> Result<(), PipelineError> {
        self.insert_shared(index, Arc::new(behavior))
    }

    /// Insert a shared behavior at `index`
    ///
    /// # Errors
    /// Returns [`PipelineError::IndexOutOfBounds`] if `index > len`
    pub fn insert_shared(&mut self, index: usize, behavior: Arc<dyn Behavior>) -> Result<(), PipelineError> {
        if index > self.behaviors.len() {
            return Err(PipelineError::IndexOutOfBounds {
                index,
                len: self.behaviors.len(),
            });
        }
        tracing::debug!(behavior = behavior.name(), position = index, "inserted behavior");
        self.behaviors.insert(index, behavior);
        Ok(())
    }

    /// Insert a behavior just before the first behavior of type `A`
    ///
    /// # Errors
    /// Returns [`PipelineError::AnchorNotFound`] if no `A` is in the chain
    pub fn insert_before<A: Behavior>(&mut self, behavior: impl Behavior) -> Result<(), PipelineError> {
        let index = self.position::<A>().ok_or(PipelineError::AnchorNotFound {
            anchor: std::any::type_name::<A>(),
        })?;
        self.insert_shared(index, Arc::new(behavior))
    }

    /// Remove the first behavior of type `A`
    ///
    /// Returns `None` if the chain has no `A`.
    pub fn remove<A: Behavior>(&mut self) -> Option<Arc<dyn Behavior>> {
        let index = self.position::<A>()?;
        let removed = self.behaviors.remove(index);
        tracing::debug!(behavior = removed.name(), position = index, "removed behavior");
        Some(removed)
    }

    /// Remove the behavior at `index`
    ///
    /// # Errors
    /// Returns [`PipelineError::IndexOutOfBounds`] if `index >= len`
    pub fn remove_at(&mut self, index: usize) -> Result<Arc<dyn Behavior>, PipelineError> {
        if index >= self.behaviors.len() {
            return Err(PipelineError::IndexOutOfBounds {
                index,
                len: self.behaviors.len(),
            });
        }
        let removed = self.behaviors.remove(index);
        tracing::debug!(behavior = removed.name(), position = index, "removed behavior");
        Ok(removed)
    }

    /// Remove every behavior; the terminal stays
    pub fn clear(&mut self) {
        self.behaviors.clear();
    }

    /// Current chain, in dispatch order
    #[inline]
    #[must_use]
    pub fn behaviors(&self) -> &[Arc<dyn Behavior>] {
        &self.behaviors
    }

    /// Owned copy of the chain, unaffected by later edits
    #[must_use]
    pub fn snapshot(&self) -> Vec<Arc<dyn Behavior>> {
        self.behaviors.clone()
    }

    /// Number of behaviors, not counting the terminal
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.behaviors.len()
    }

    /// Check if the chain is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.behaviors.is_empty()
    }

    /// Check if a behavior of type `A` is in the chain
    #[inline]
    #[must_use]
    pub fn contains<A: Behavior>(&self) -> bool {
        self.position::<A>().is_some()
    }

    fn position<A: Behavior>(&self) -> Option<usize> {
        // Dynamic dispatch through the `Any` supertrait yields the concrete type.
        self.behaviors
            .iter()
            .position(|behavior| Any::type_id(&**behavior) == TypeId::of::<A>())
    }

    // ========================================================================
    // Defaults
    // ========================================================================

    /// Terminal behavior
    #[inline]
    #[must_use]
    pub fn terminal(&self) -> &DefaultValueBehavior {
        &self.terminal
    }

    /// Default-value provider used by the terminal
    #[inline]
    #[must_use]
    pub fn defaults(&self) -> &DefaultValueProvider {
        self.terminal.provider()
    }

    /// Mutable default-value provider, for registering overrides
    #[inline]
    pub fn defaults_mut(&mut self) -> &mut DefaultValueProvider {
        self.terminal.provider_mut()
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Dispatch the invocation; faults come back as data
    pub fn invoke(&self, invocation: &mut MethodInvocation<'_>) -> MethodReturn {
        tracing::trace!(method = invocation.method().name(), chain = self.behaviors.len(), "dispatching invocation");
        Next::new(&self.behaviors, &self.terminal).run(invocation)
    }

    /// Dispatch a void or output-only call
    ///
    /// # Errors
    /// Returns [`ExecuteError::Faulted`] if a behavior produced a fault
    pub fn execute(&self, invocation: &mut MethodInvocation<'_>) -> Result<MethodReturn, ExecuteError> {
        let ret = self.invoke(invocation);
        match ret.fault() {
            Some(fault) => Err(ExecuteError::Faulted(fault.clone())),
            None => Ok(ret),
        }
    }

    /// Dispatch a value-returning call and unwrap the value
    ///
    /// Reference-typed returns default to `Null`; read them as `Option<T>`.
    ///
    /// # Errors
    /// - [`ExecuteError::Faulted`] if a behavior produced a fault
    /// - [`ExecuteError::ReturnType`] if the value is not assignable to `T`
    pub fn execute_as<T: FromValue>(&self, invocation: &mut MethodInvocation<'_>) -> Result<T, ExecuteError> {
        let ret = self.execute(invocation)?;
        Ok(ret.return_value_as::<T>()?)
    }

    /// Dispatch a by-reference-returning call
    ///
    /// # Errors
    /// - [`ExecuteError::Faulted`] if a behavior produced a fault
    /// - [`ExecuteError::ReturnType`] if the value is not assignable to `T`
    pub fn execute_ref<T: FromValue>(
        &self,
        invocation: &mut MethodInvocation<'_>,
    ) -> Result<RefReturn<T>, ExecuteError> {
        self.execute_as::<T>(invocation).map(RefReturn::new)
    }
}

/// Substitute implementation routed through a [`BehaviorPipeline`]
///
/// Hand-written or generated substitute types implement this so callers can
/// configure their behaviors without knowing the concrete type.
pub trait Surrogate {
    /// Pipeline every call is dispatched through
    fn pipeline(&self) -> &BehaviorPipeline;

    /// Mutable pipeline, for configuration
    fn pipeline_mut(&mut self) -> &mut BehaviorPipeline;

    /// Append a behavior to the pipeline
    fn add_behavior(&mut self, behavior: impl Behavior) -> &mut Self
    where
        Self: Sized,
    {
        self.pipeline_mut().add(behavior);
        self
    }
}

//! Terminal behavior backed by the default-value provider

use crate::behavior::{Behavior, Next};
use crate::config::{PipelineConfig, RefArgumentPolicy};
use crate::invocation::MethodInvocation;
use crate::method::ParameterMode;
use crate::method_return::MethodReturn;
use std::sync::Arc;
use surrogate_defaults::DefaultValueProvider;

/// Chain terminator that always applies and never delegates
///
/// Synthesizes the return value and every `out` slot from the parameter's or
/// return's declared type. `ref` slots keep the caller's value unless the
/// policy is [`RefArgumentPolicy::Reset`]. Constructors succeed with an
/// empty return.
#[derive(Debug, Clone, Default)]
pub struct DefaultValueBehavior {
    provider: DefaultValueProvider,
    ref_arguments: RefArgumentPolicy,
}

impl DefaultValueBehavior {
    /// Create terminal with an empty provider
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create terminal with a configured provider
    #[inline]
    #[must_use]
    pub fn with_provider(provider: DefaultValueProvider) -> Self {
        Self {
            provider,
            ref_arguments: RefArgumentPolicy::default(),
        }
    }

    /// Apply pipeline configuration
    #[inline]
    #[must_use]
    pub fn configured(mut self, config: &PipelineConfig) -> Self {
        self.ref_arguments = config.ref_arguments;
        self
    }

    /// Provider used for synthesis
    #[inline]
    #[must_use]
    pub fn provider(&self) -> &DefaultValueProvider {
        &self.provider
    }

    /// Mutable provider, for registering overrides
    #[inline]
    pub fn provider_mut(&mut self) -> &mut DefaultValueProvider {
        &mut self.provider
    }

    /// Current `ref` argument policy
    #[inline]
    #[must_use]
    pub fn ref_arguments(&self) -> RefArgumentPolicy {
        self.ref_arguments
    }

    pub(crate) fn set_ref_arguments(&mut self, policy: RefArgumentPolicy) {
        self.ref_arguments = policy;
    }
}

impl Behavior for DefaultValueBehavior {
    fn execute(&self, invocation: &mut MethodInvocation<'_>, _next: Next<'_>) -> MethodReturn {
        let method = Arc::clone(invocation.method_arc());

        if method.is_constructor() {
            tracing::trace!(method = method.name(), "constructor satisfied with empty return");
            return MethodReturn::default();
        }

        for parameter in method.parameters() {
            let reset = match parameter.mode {
                ParameterMode::Out => true,
                ParameterMode::Ref => self.ref_arguments == RefArgumentPolicy::Reset,
                ParameterMode::In => false,
            };
            if reset {
                let value = self.provider.get_default(&parameter.ty);
                invocation.write_slot(parameter.position, value);
            }
        }

        match method.return_type() {
            Some(ty) => {
                let value = self.provider.get_default(ty);
                MethodReturn::value(Some(value), invocation.outputs())
            }
            None => invocation.create_void_return(),
        }
    }

    fn name(&self) -> &'static str {
        "DefaultValueBehavior"
    }
}

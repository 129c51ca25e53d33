//! Pipeline configuration

use serde::{Deserialize, Serialize};

/// How the terminal default behavior treats `ref` arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefArgumentPolicy {
    /// Echo the caller's value back unchanged
    #[default]
    Preserve,

    /// Overwrite with the synthesized default of the parameter type
    Reset,
}

/// Pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Treatment of `ref` arguments when no behavior satisfies the call
    pub ref_arguments: RefArgumentPolicy,
}

impl PipelineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set ref argument policy
    #[inline]
    #[must_use]
    pub fn with_ref_arguments(mut self, policy: RefArgumentPolicy) -> Self {
        self.ref_arguments = policy;
        self
    }
}

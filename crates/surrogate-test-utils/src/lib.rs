//! Testing utilities for the surrogate workspace
//!
//! Shared fixtures: sample method descriptors, ordered counting behaviors,
//! a minimal hand-written substitute, and tracing initialisation.

#![allow(missing_docs)]

use parking_lot::Mutex;
use std::sync::Arc;
use surrogate_pipeline::{
    Behavior, BehaviorPipeline, MethodDescriptor, MethodInvocation, MethodReturn, Next, Surrogate,
};
use surrogate_types::{PrimitiveType, TypeDescriptor};

/// Install a test-friendly subscriber honouring `RUST_LOG`
///
/// Safe to call from every test; only the first call installs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ============================================================================
// Descriptors
// ============================================================================

pub fn platform_id() -> TypeDescriptor {
    TypeDescriptor::enumeration("PlatformID", PrimitiveType::I32)
}

pub fn object_array() -> TypeDescriptor {
    TypeDescriptor::array_of(TypeDescriptor::object())
}

fn shared(method: MethodDescriptor) -> Arc<MethodDescriptor> {
    Arc::new(method)
}

/// `int[] Values()`
pub fn values_method() -> Arc<MethodDescriptor> {
    shared(
        MethodDescriptor::builder("Values")
            .returns(TypeDescriptor::array_of(TypeDescriptor::I32))
            .build()
            .unwrap(),
    )
}

/// `void Set(out int x)`
pub fn set_out_method() -> Arc<MethodDescriptor> {
    shared(
        MethodDescriptor::builder("Set")
            .out_param("x", TypeDescriptor::I32)
            .build()
            .unwrap(),
    )
}

/// `Task<bool> Flag()`
pub fn flag_method() -> Arc<MethodDescriptor> {
    shared(
        MethodDescriptor::builder("Flag")
            .returns(TypeDescriptor::task_of(TypeDescriptor::BOOL))
            .build()
            .unwrap(),
    )
}

/// `void VoidWithRef(ref object[] refValue)`
pub fn void_with_ref() -> Arc<MethodDescriptor> {
    shared(
        MethodDescriptor::builder("VoidWithRef")
            .ref_param("refValue", object_array())
            .build()
            .unwrap(),
    )
}

/// `void VoidWithRefEnum(ref PlatformID refEnum)`
pub fn void_with_ref_enum() -> Arc<MethodDescriptor> {
    shared(
        MethodDescriptor::builder("VoidWithRefEnum")
            .ref_param("refEnum", platform_id())
            .build()
            .unwrap(),
    )
}

/// `void VoidWithOut(out object[] refValue)`
pub fn void_with_out() -> Arc<MethodDescriptor> {
    shared(
        MethodDescriptor::builder("VoidWithOut")
            .out_param("refValue", object_array())
            .build()
            .unwrap(),
    )
}

/// `PlatformID ReturnEnum()`
pub fn return_enum() -> Arc<MethodDescriptor> {
    shared(
        MethodDescriptor::builder("ReturnEnum")
            .returns(platform_id())
            .build()
            .unwrap(),
    )
}

/// `Foo(PlatformID platform)`
pub fn foo_constructor() -> Arc<MethodDescriptor> {
    shared(
        MethodDescriptor::constructor("Foo")
            .param("platform", platform_id())
            .build()
            .unwrap(),
    )
}

/// `ref int Get()`
pub fn ref_get() -> Arc<MethodDescriptor> {
    shared(
        MethodDescriptor::builder("Get")
            .returns_ref(TypeDescriptor::I32)
            .build()
            .unwrap(),
    )
}

// ============================================================================
// Behaviors
// ============================================================================

/// Shared log of behavior ids, in execution order
pub type CallLog = Arc<Mutex<Vec<usize>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Behavior that logs its id, then either delegates or short-circuits
#[derive(Debug)]
pub struct CountingBehavior {
    pub id: usize,
    pub log: CallLog,
    pub short_circuit: bool,
}

impl CountingBehavior {
    pub fn delegating(id: usize, log: &CallLog) -> Self {
        Self {
            id,
            log: Arc::clone(log),
            short_circuit: false,
        }
    }

    pub fn short_circuiting(id: usize, log: &CallLog) -> Self {
        Self {
            id,
            log: Arc::clone(log),
            short_circuit: true,
        }
    }
}

impl Behavior for CountingBehavior {
    fn execute(&self, invocation: &mut MethodInvocation<'_>, next: Next<'_>) -> MethodReturn {
        self.log.lock().push(self.id);
        if self.short_circuit {
            invocation.create_void_return()
        } else {
            next.run(invocation)
        }
    }
}

/// Build a chain of `n` counting behaviors where `stop` (1-indexed) short-circuits
pub fn counting_pipeline(n: usize, stop: Option<usize>, log: &CallLog) -> BehaviorPipeline {
    let mut pipeline = BehaviorPipeline::new();
    for id in 1..=n {
        if Some(id) == stop {
            pipeline.add(CountingBehavior::short_circuiting(id, log));
        } else {
            pipeline.add(CountingBehavior::delegating(id, log));
        }
    }
    pipeline
}

// ============================================================================
// Substitutes
// ============================================================================

/// Hand-written substitute for `interface IMemory { ref int Get(); }`
#[derive(Debug, Default)]
pub struct MemorySurrogate {
    pipeline: BehaviorPipeline,
}

impl MemorySurrogate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> surrogate_pipeline::RefReturn<i32> {
        let mut invocation = MethodInvocation::create(self, ref_get(), []).unwrap();
        self.pipeline.execute_ref::<i32>(&mut invocation).unwrap()
    }
}

impl Surrogate for MemorySurrogate {
    fn pipeline(&self) -> &BehaviorPipeline {
        &self.pipeline
    }

    fn pipeline_mut(&mut self) -> &mut BehaviorPipeline {
        &mut self.pipeline
    }
}

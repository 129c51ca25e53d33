use pretty_assertions::assert_eq;
use surrogate_pipeline::{Argument, BehaviorPipeline, MethodInvocation, PipelineConfig, RefArgumentPolicy};
use surrogate_test_utils::void_with_ref_enum;
use surrogate_types::{EnumValue, Value};

struct Target;

#[test]
fn test_config_from_json() {
    let config: PipelineConfig = serde_json::from_str(r#"{ "ref_arguments": "reset" }"#).unwrap();
    assert_eq!(config, PipelineConfig::new().with_ref_arguments(RefArgumentPolicy::Reset));
}

#[test]
fn test_missing_fields_use_defaults() {
    let config: PipelineConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, PipelineConfig::default());
}

#[test]
fn test_config_roundtrips_through_json() {
    let config = PipelineConfig::new().with_ref_arguments(RefArgumentPolicy::Reset);
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(json, r#"{"ref_arguments":"reset"}"#);
}

#[test]
fn test_reset_policy_overwrites_ref_arguments() {
    let config = PipelineConfig::new().with_ref_arguments(RefArgumentPolicy::Reset);
    let pipeline = BehaviorPipeline::with_config(&config);
    assert_eq!(pipeline.terminal().ref_arguments(), RefArgumentPolicy::Reset);

    let xbox = Value::Enum(EnumValue::new("PlatformID", 5));
    let mut invocation = MethodInvocation::create(&Target, void_with_ref_enum(), [Argument::Ref(xbox)]).unwrap();
    let ret = pipeline.execute(&mut invocation).unwrap();

    assert_eq!(ret.outputs().get(0), Some(&Value::Enum(EnumValue::zero("PlatformID"))));
}

#[test]
fn test_configure_existing_pipeline() {
    let mut pipeline = BehaviorPipeline::new();
    assert_eq!(pipeline.terminal().ref_arguments(), RefArgumentPolicy::Preserve);

    pipeline.configure(&PipelineConfig::new().with_ref_arguments(RefArgumentPolicy::Reset));
    assert_eq!(pipeline.terminal().ref_arguments(), RefArgumentPolicy::Reset);
}

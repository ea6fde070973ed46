use tensile_rig::telemetry::{
    DEFAULT_FILTER_DIRECTIVE, init_default_tracing, init_tracing_with_fallback,
};

#[test]
fn default_filter_targets_the_crate() {
    assert!(DEFAULT_FILTER_DIRECTIVE.starts_with("tensile_rig="));
}

#[cfg(not(feature = "telemetry"))]
#[test]
fn tracing_init_is_a_no_op_without_feature() {
    assert!(!init_default_tracing());
    assert!(!init_tracing_with_fallback("tensile_rig=trace"));
}

#[cfg(feature = "telemetry")]
#[test]
fn tracing_init_succeeds_only_once() {
    let first = init_tracing_with_fallback("tensile_rig=trace");
    let second = init_default_tracing();
    assert!(first);
    assert!(!second);
}

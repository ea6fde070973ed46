mod animation_sync;
mod clock;
mod engine;
mod engine_config;
mod engine_snapshot;
mod json_contract;
mod listener_dispatch;
mod listener_registry;
mod playback_scheduler;
mod run_controller;
mod snapshot_controller;
mod threshold_emitter;
mod validation;

pub use animation_sync::{
    AnimationSyncState, AnimationSynchronizer, post_rupture_duration, scrub_target,
};
pub use clock::{ManualClock, PlaybackClock, SystemClock};
pub use engine::{TestRig, TestSetup};
pub use engine_config::RigConfig;
pub use engine_snapshot::{RigSnapshot, TestSummary};
pub use json_contract::{
    RIG_SNAPSHOT_JSON_SCHEMA_V1, RigSnapshotJsonContractV1, TEST_SUMMARY_JSON_SCHEMA_V1,
    TestSummaryJsonContractV1,
};
pub use playback_scheduler::{
    GraphState, PacingScheduler, PlaybackEvent, PlaybackEvents, PlaybackState, PreparedRun,
    compute_sample_delays,
};
pub use threshold_emitter::{
    ThresholdEmitter, ThresholdEvent, ThresholdFlags, ThresholdLimits, evaluate_thresholds,
};

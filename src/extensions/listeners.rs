use serde::{Deserialize, Serialize};

use crate::api::{GraphState, PlaybackState, ThresholdFlags};
use crate::core::KeyPoints;

/// Read-only state snapshot passed to listener hooks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigContext {
    pub playback: PlaybackState,
    pub flags: ThresholdFlags,
    pub key_points: KeyPoints,
    pub max_force_kn: Option<f64>,
    pub sample_count: usize,
}

/// Notifications the rig publishes to the surrounding application.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RigEvent {
    GraphStateChanged(GraphState),
    SamplePlotted {
        strain_percent: f64,
        force_kn: f64,
    },
    MaxForceCalculated {
        force_kn: f64,
    },
    KeyPointsCalculated {
        uts_strain_percent: Option<f64>,
        rupture_strain_percent: Option<f64>,
        proportionality_limit_kn: Option<f64>,
    },
    ExtensometerEvent {
        attached: bool,
        removed: bool,
    },
    ForceLimitExceeded,
    TestSequenceCompleted,
}

/// One-way observer of rig events.
///
/// Listeners see state through `RigContext` and cannot write back into the
/// scheduler.
pub trait RigListener {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: RigEvent, context: RigContext);
}

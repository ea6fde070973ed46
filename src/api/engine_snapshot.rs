use serde::{Deserialize, Serialize};

use crate::core::{EffectiveSpeed, KeyPoints};

use super::{AnimationSyncState, GraphState, PlaybackState, ThresholdFlags};

/// Serializable deterministic state snapshot used by regression tests and
/// debugging tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigSnapshot {
    pub state: GraphState,
    pub playback: PlaybackState,
    pub flags: ThresholdFlags,
    pub key_points: KeyPoints,
    pub max_force_kn: Option<f64>,
    pub effective_speed: Option<EffectiveSpeed>,
    pub animation: AnimationSyncState,
    pub sample_count: usize,
    pub plotted_points: usize,
}

/// End-of-run figures handed to reporting collaborators.
///
/// The proportionality limit is only reported when the extensometer was
/// attached during the run, whether or not the curve itself reached that
/// region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSummary {
    pub material: String,
    pub max_force_kn: f64,
    pub uts_strain_percent: Option<f64>,
    pub rupture_strain_percent: Option<f64>,
    pub proportionality_limit_kn: Option<f64>,
    pub extensometer_used: bool,
    pub force_limit_exceeded: bool,
    pub completed: bool,
}

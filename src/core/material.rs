use serde::{Deserialize, Serialize};

use crate::core::curve_store::CurveSource;

/// Material selection supplied once per run.
///
/// Negative limit/threshold values mean "not configured".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialProfile {
    pub name: String,
    #[serde(default)]
    pub curve: Option<CurveSource>,
    #[serde(default = "unset")]
    pub proportionality_limit_mpa: f64,
    #[serde(default = "unset")]
    pub rupture_stress_threshold_mpa: f64,
}

fn unset() -> f64 {
    -1.0
}

impl MaterialProfile {
    #[must_use]
    pub fn new(name: impl Into<String>, curve: CurveSource) -> Self {
        Self {
            name: name.into(),
            curve: Some(curve),
            proportionality_limit_mpa: unset(),
            rupture_stress_threshold_mpa: unset(),
        }
    }

    #[must_use]
    pub fn with_proportionality_limit_mpa(mut self, limit_mpa: f64) -> Self {
        self.proportionality_limit_mpa = limit_mpa;
        self
    }

    #[must_use]
    pub fn with_rupture_stress_threshold_mpa(mut self, threshold_mpa: f64) -> Self {
        self.rupture_stress_threshold_mpa = threshold_mpa;
        self
    }
}

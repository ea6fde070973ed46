use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::error::{RigError, RigResult};

/// Public rig bootstrap configuration.
///
/// Serializable so host applications can persist/load machine setup without
/// inventing their own ad-hoc format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigConfig {
    pub machine_force_limit_kn: f64,
    /// Floor for the wait between two emitted samples.
    #[serde(default = "default_min_sample_delay_s")]
    pub min_sample_delay_s: f64,
    #[serde(default = "default_extensometer_attach_ratio")]
    pub extensometer_attach_ratio: f64,
    #[serde(default = "default_extensometer_detach_ratio")]
    pub extensometer_detach_ratio: f64,
    /// Tail length used when the clip timing cannot provide one.
    #[serde(default = "default_post_rupture_fallback_s")]
    pub post_rupture_fallback_s: f64,
    #[serde(default = "default_plot_viewport")]
    pub plot_viewport: Viewport,
}

impl RigConfig {
    #[must_use]
    pub fn new(machine_force_limit_kn: f64) -> Self {
        Self {
            machine_force_limit_kn,
            min_sample_delay_s: default_min_sample_delay_s(),
            extensometer_attach_ratio: default_extensometer_attach_ratio(),
            extensometer_detach_ratio: default_extensometer_detach_ratio(),
            post_rupture_fallback_s: default_post_rupture_fallback_s(),
            plot_viewport: default_plot_viewport(),
        }
    }

    #[must_use]
    pub fn with_min_sample_delay_s(mut self, min_sample_delay_s: f64) -> Self {
        self.min_sample_delay_s = min_sample_delay_s;
        self
    }

    /// Sets the fractions of peak force at which the extensometer is
    /// attached and removed.
    #[must_use]
    pub fn with_extensometer_ratios(mut self, attach_ratio: f64, detach_ratio: f64) -> Self {
        self.extensometer_attach_ratio = attach_ratio;
        self.extensometer_detach_ratio = detach_ratio;
        self
    }

    #[must_use]
    pub fn with_post_rupture_fallback_s(mut self, fallback_s: f64) -> Self {
        self.post_rupture_fallback_s = fallback_s;
        self
    }

    #[must_use]
    pub fn with_plot_viewport(mut self, viewport: Viewport) -> Self {
        self.plot_viewport = viewport;
        self
    }

    pub fn to_json_pretty(&self) -> RigResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| RigError::InvalidData(format!("failed to serialize config: {e}")))
    }

    pub fn from_json_str(input: &str) -> RigResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| RigError::InvalidData(format!("failed to parse config: {e}")))
    }
}

fn default_min_sample_delay_s() -> f64 {
    0.001
}

fn default_extensometer_attach_ratio() -> f64 {
    0.25
}

fn default_extensometer_detach_ratio() -> f64 {
    0.75
}

fn default_post_rupture_fallback_s() -> f64 {
    0.5
}

fn default_plot_viewport() -> Viewport {
    Viewport::new(800, 600)
}

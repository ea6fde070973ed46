use serde::{Deserialize, Serialize};

use crate::error::{RigError, RigResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Plot-space point: `x` is strain in percent, `y` is force in kN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

impl DataPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Raw curve sample as recorded for the material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveSample {
    pub strain_percent: f64,
    pub stress_mpa: f64,
}

impl CurveSample {
    #[must_use]
    pub fn new(strain_percent: f64, stress_mpa: f64) -> Self {
        Self {
            strain_percent,
            stress_mpa,
        }
    }
}

/// Curve sample rescaled to the specimen cross-section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaledSample {
    pub strain_percent: f64,
    pub force_kn: f64,
}

impl ScaledSample {
    #[must_use]
    pub fn new(strain_percent: f64, force_kn: f64) -> Self {
        Self {
            strain_percent,
            force_kn,
        }
    }

    #[must_use]
    pub fn to_data_point(self) -> DataPoint {
        DataPoint::new(self.strain_percent, self.force_kn)
    }
}

/// How `SpecimenContext::speed_value` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedMode {
    /// Crosshead travel in mm/min.
    DeformationRate,
    /// Loading rate in kN/s.
    ForceRate,
}

/// Specimen geometry and machine speed for one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpecimenContext {
    pub length_mm: f64,
    pub area_mm2: f64,
    pub speed_value: f64,
    pub speed_mode: SpeedMode,
}

impl SpecimenContext {
    #[must_use]
    pub fn new(length_mm: f64, area_mm2: f64, speed_value: f64, speed_mode: SpeedMode) -> Self {
        Self {
            length_mm,
            area_mm2,
            speed_value,
            speed_mode,
        }
    }

    /// Rejects non-finite or non-positive geometry and speed.
    pub fn validate(self) -> RigResult<Self> {
        for (name, value) in [
            ("length_mm", self.length_mm),
            ("area_mm2", self.area_mm2),
            ("speed_value", self.speed_value),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(RigError::Configuration(format!(
                    "specimen `{name}` must be finite and > 0 (received {value})"
                )));
            }
        }
        Ok(self)
    }
}

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::curve_store::Curve;
use crate::core::types::{ScaledSample, SpecimenContext, SpeedMode};

/// Stress (MPa) times area (mm²) gives N; the rig reports kN.
const NEWTONS_PER_KILONEWTON: f64 = 1000.0;

/// Curve converted into specimen force units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaledCurve {
    pub samples: Vec<ScaledSample>,
    pub max_force_kn: f64,
    pub proportionality_limit_kn: Option<f64>,
}

#[must_use]
pub fn stress_to_force_kn(stress_mpa: f64, area_mm2: f64) -> f64 {
    stress_mpa * area_mm2 / NEWTONS_PER_KILONEWTON
}

/// Rescales raw stress samples to force for the given cross-section.
///
/// A negative material limit (or a non-positive area) leaves the
/// proportionality limit unknown instead of failing.
#[must_use]
pub fn scale_curve(
    curve: &Curve,
    specimen: &SpecimenContext,
    proportionality_limit_mpa: f64,
) -> ScaledCurve {
    let area = specimen.area_mm2;
    let samples = curve
        .samples()
        .iter()
        .map(|s| ScaledSample::new(s.strain_percent, stress_to_force_kn(s.stress_mpa, area)))
        .collect();

    let proportionality_limit_kn = (proportionality_limit_mpa >= 0.0 && area > 0.0)
        .then(|| stress_to_force_kn(proportionality_limit_mpa, area));

    ScaledCurve {
        samples,
        max_force_kn: stress_to_force_kn(curve.raw_max_stress(), area),
        proportionality_limit_kn,
    }
}

/// Why a force-rate speed could not be converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedConversionWarning {
    NonPositiveMaxForce,
    MissingUltimateStrain,
    NonPositiveSpeed,
    /// The conversion produced a zero or non-finite speed (e.g. UTS at 0 %).
    DegenerateResult,
}

/// Crosshead speed the scheduler paces against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectiveSpeed {
    pub mm_per_min: f64,
    /// Set when a force-rate conversion fell back to the raw input value.
    pub warning: Option<SpeedConversionWarning>,
}

/// Converts the configured speed into mm/min.
///
/// Force-rate specs are approximated by assuming a linear ramp to peak force:
/// the time to peak at the given kN/s rate and the elongation at the UTS strain
/// define an average crosshead speed. This is a heuristic, not an exact
/// physical conversion.
#[must_use]
pub fn effective_speed_mm_per_min(
    specimen: &SpecimenContext,
    uts_strain_percent: Option<f64>,
    max_force_kn: f64,
) -> EffectiveSpeed {
    let speed = specimen.speed_value;
    if specimen.speed_mode == SpeedMode::DeformationRate {
        return EffectiveSpeed {
            mm_per_min: speed,
            warning: None,
        };
    }

    let warning = if max_force_kn <= 0.0 {
        Some(SpeedConversionWarning::NonPositiveMaxForce)
    } else if speed <= 0.0 {
        Some(SpeedConversionWarning::NonPositiveSpeed)
    } else {
        match uts_strain_percent {
            Some(uts) if uts >= 0.0 => {
                let time_to_peak_s = max_force_kn / speed;
                let deformation_at_peak_mm = uts / 100.0 * specimen.length_mm;
                let mm_per_min = deformation_at_peak_mm / time_to_peak_s * 60.0;
                if mm_per_min.is_finite() && mm_per_min > 0.0 {
                    return EffectiveSpeed {
                        mm_per_min,
                        warning: None,
                    };
                }
                Some(SpeedConversionWarning::DegenerateResult)
            }
            _ => Some(SpeedConversionWarning::MissingUltimateStrain),
        }
    };

    warn!(
        speed_kn_per_s = speed,
        max_force_kn,
        ?uts_strain_percent,
        ?warning,
        "force-rate speed conversion fell back to raw value"
    );
    EffectiveSpeed {
        mm_per_min: speed,
        warning,
    }
}

pub mod curve_store;
pub mod key_points;
pub mod line_series;
pub mod material;
pub mod primitives;
pub mod scale;
pub mod scaling;
pub mod types;

pub use curve_store::{Curve, CurveSource};
pub use key_points::{KeyPoints, find_key_points, find_uts_index, interpolate_strain_at};
pub use line_series::{LineSegment, PlotSeries, project_line_segments};
pub use material::MaterialProfile;
pub use scale::LinearScale;
pub use scaling::{
    EffectiveSpeed, ScaledCurve, SpeedConversionWarning, effective_speed_mm_per_min,
    scale_curve, stress_to_force_kn,
};
pub use types::{CurveSample, DataPoint, ScaledSample, SpecimenContext, SpeedMode, Viewport};

use serde::{Deserialize, Serialize};

use crate::core::scale::LinearScale;
use crate::core::types::{DataPoint, Viewport};
use crate::error::{RigError, RigResult};

/// Projected line segment in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Live force-strain series fed by `SamplePlotted` emissions.
///
/// The axis domain is fixed at preparation time from the run's maxima so the
/// plot does not rescale while the test is running.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlotSeries {
    points: Vec<DataPoint>,
    strain_domain: (f64, f64),
    force_domain: (f64, f64),
}

impl PlotSeries {
    /// Resets the series and sizes the axes for a new run.
    ///
    /// Degenerate maxima fall back to a unit span.
    pub fn prepare(&mut self, max_strain_percent: f64, max_force_kn: f64) {
        self.points.clear();
        self.strain_domain = (0.0, positive_or_unit(max_strain_percent));
        self.force_domain = (0.0, positive_or_unit(max_force_kn));
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn push(&mut self, point: DataPoint) {
        self.points.push(point);
    }

    #[must_use]
    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    #[must_use]
    pub fn strain_domain(&self) -> (f64, f64) {
        self.strain_domain
    }

    #[must_use]
    pub fn force_domain(&self) -> (f64, f64) {
        self.force_domain
    }

    pub fn project_line_segments(&self, viewport: Viewport) -> RigResult<Vec<LineSegment>> {
        if !viewport.is_valid() {
            return Err(RigError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        let strain_scale = LinearScale::new(self.strain_domain.0, self.strain_domain.1)?;
        let force_scale = LinearScale::new(self.force_domain.0, self.force_domain.1)?.inverted();
        project_line_segments(&self.points, strain_scale, force_scale, viewport)
    }
}

fn positive_or_unit(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        1.0
    }
}

/// Projects plot points into adjacent line segments.
///
/// Deterministic and side-effect free so hosts and tests consume the exact
/// same geometry.
pub fn project_line_segments(
    points: &[DataPoint],
    x_scale: LinearScale,
    y_scale: LinearScale,
    viewport: Viewport,
) -> RigResult<Vec<LineSegment>> {
    if points.len() < 2 {
        return Ok(Vec::new());
    }

    let mut mapped = Vec::with_capacity(points.len());
    for point in points {
        let x = x_scale.domain_to_pixel(point.x, viewport.width)?;
        let y = y_scale.domain_to_pixel(point.y, viewport.height)?;
        mapped.push((x, y));
    }

    let mut segments = Vec::with_capacity(mapped.len() - 1);
    for pair in mapped.windows(2) {
        segments.push(LineSegment {
            x1: pair[0].0,
            y1: pair[0].1,
            x2: pair[1].0,
            y2: pair[1].1,
        });
    }

    Ok(segments)
}

use crate::error::{RigError, RigResult};

/// Linear mapping between one plot axis (strain or force) and pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    inverted: bool,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64) -> RigResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(RigError::InvalidData(format!(
                "axis domain must be finite with distinct ends ({domain_start}..{domain_end})"
            )));
        }

        Ok(Self {
            domain_start,
            domain_end,
            inverted: false,
        })
    }

    /// Maps the domain start to the far pixel edge (screen-space y axis).
    #[must_use]
    pub fn inverted(mut self) -> Self {
        self.inverted = !self.inverted;
        self
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    pub fn domain_to_pixel(self, value: f64, extent_px: u32) -> RigResult<f64> {
        if extent_px == 0 {
            return Err(RigError::InvalidData(
                "plot extent must be at least one pixel".to_owned(),
            ));
        }
        if !value.is_finite() {
            return Err(RigError::InvalidData(format!("axis value {value} is not finite")));
        }

        let span = self.domain_end - self.domain_start;
        let mut normalized = (value - self.domain_start) / span;
        if self.inverted {
            normalized = 1.0 - normalized;
        }
        Ok(normalized * f64::from(extent_px))
    }

    pub fn pixel_to_domain(self, pixel: f64, extent_px: u32) -> RigResult<f64> {
        if extent_px == 0 {
            return Err(RigError::InvalidData(
                "plot extent must be at least one pixel".to_owned(),
            ));
        }
        if !pixel.is_finite() {
            return Err(RigError::InvalidData(format!("pixel position {pixel} is not finite")));
        }

        let span = self.domain_end - self.domain_start;
        let mut normalized = pixel / f64::from(extent_px);
        if self.inverted {
            normalized = 1.0 - normalized;
        }
        Ok(self.domain_start + normalized * span)
    }
}

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::types::ScaledSample;

const FLAT_SEGMENT_EPSILON: f64 = 1e-9;

/// Mechanically significant points of one run.
///
/// `None` marks a point that could not be determined. When both strains are
/// present `rupture_strain_percent >= uts_strain_percent` holds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct KeyPoints {
    pub uts_strain_percent: Option<f64>,
    pub rupture_strain_percent: Option<f64>,
    pub proportionality_limit_kn: Option<f64>,
}

impl KeyPoints {
    /// Both strains are known, so animation triggering is possible.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.uts_and_rupture().is_some()
    }

    #[must_use]
    pub fn uts_and_rupture(&self) -> Option<(f64, f64)> {
        match (self.uts_strain_percent, self.rupture_strain_percent) {
            (Some(uts), Some(rupture)) if uts >= 0.0 && rupture >= 0.0 => Some((uts, rupture)),
            _ => None,
        }
    }
}

/// Index of the maximum-force sample; the first one wins on ties.
#[must_use]
pub fn find_uts_index(samples: &[ScaledSample]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, sample) in samples.iter().enumerate() {
        match best {
            Some((_, force)) if sample.force_kn <= force => {}
            _ => best = Some((index, sample.force_kn)),
        }
    }
    best.map(|(index, _)| index)
}

/// Locates the ultimate-strength and rupture strains.
///
/// `rupture_threshold_kn < 0` means no threshold is configured. The result is
/// deterministic for a given curve and threshold.
#[must_use]
pub fn find_key_points(
    samples: &[ScaledSample],
    rupture_threshold_kn: f64,
    proportionality_limit_kn: Option<f64>,
) -> KeyPoints {
    let mut key_points = KeyPoints {
        uts_strain_percent: None,
        rupture_strain_percent: None,
        proportionality_limit_kn,
    };

    if samples.len() < 2 {
        return key_points;
    }
    let Some(uts_index) = find_uts_index(samples) else {
        return key_points;
    };

    let uts = samples[uts_index].strain_percent;
    let last = samples[samples.len() - 1].strain_percent;

    let rupture = if rupture_threshold_kn < 0.0 {
        if last > uts { last } else { uts }
    } else {
        find_threshold_crossing(&samples[uts_index..], rupture_threshold_kn).unwrap_or(last)
    };

    let rupture = if rupture < uts {
        if last >= uts { last } else { uts }
    } else {
        rupture
    };

    debug!(
        uts_index,
        uts_strain_percent = uts,
        rupture_strain_percent = rupture,
        rupture_threshold_kn,
        "key points calculated"
    );

    key_points.uts_strain_percent = Some(uts);
    key_points.rupture_strain_percent = Some(rupture);
    key_points
}

/// Scans forward from the peak for the first downward crossing of
/// `threshold`, interpolating strain linearly inside the crossing segment.
fn find_threshold_crossing(post_peak: &[ScaledSample], threshold: f64) -> Option<f64> {
    let first = post_peak.first()?;
    if first.force_kn < threshold {
        return Some(first.strain_percent);
    }

    post_peak.windows(2).find_map(|pair| {
        let (p1, p2) = (pair[0], pair[1]);
        if p1.force_kn >= threshold && p2.force_kn < threshold {
            Some(interpolate_strain_at(p1, p2, threshold))
        } else {
            None
        }
    })
}

#[must_use]
pub fn interpolate_strain_at(p1: ScaledSample, p2: ScaledSample, force_kn: f64) -> f64 {
    let dy = p2.force_kn - p1.force_kn;
    if dy.abs() < FLAT_SEGMENT_EPSILON {
        return p2.strain_percent;
    }
    p1.strain_percent + (p2.strain_percent - p1.strain_percent) * (force_kn - p1.force_kn) / dy
}

mod null_scene;

pub use null_scene::{NullAnimationClock, NullSpecimenScene};

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::{RigError, RigResult};

/// Playback capability of the specimen's deformation clip.
///
/// The synchronizer is the only writer. Implementations wrap whatever
/// animation engine the host scene uses.
pub trait AnimationClock {
    /// Playback rate: `0.0` freezes, `1.0` is real time.
    fn set_speed(&mut self, speed: f64);
    /// Jumps the clip to a normalized position in `[0, 1]`.
    fn scrub_to(&mut self, normalized_time: f64);
    /// Restarts the clip from its base (undeformed) pose.
    fn restart(&mut self);
}

/// Scene-side hooks the synchronizer calls into.
pub trait SpecimenScene {
    /// Cosmetic per-sample update (gauges, colour ramps). Must not affect
    /// playback decisions.
    fn update_visuals(&mut self, _strain_percent: f64, _force_kn: f64) {}

    /// Decides when the deformation animation starts.
    fn should_trigger(&mut self, strain_percent: f64, uts_strain_percent: f64) -> bool {
        strain_percent >= uts_strain_percent
    }

    /// Fired once when the plotted strain first reaches the rupture point.
    fn on_failure(&mut self) {}
}

impl<T: AnimationClock> AnimationClock for Rc<RefCell<T>> {
    fn set_speed(&mut self, speed: f64) {
        self.borrow_mut().set_speed(speed);
    }

    fn scrub_to(&mut self, normalized_time: f64) {
        self.borrow_mut().scrub_to(normalized_time);
    }

    fn restart(&mut self) {
        self.borrow_mut().restart();
    }
}

impl<T: SpecimenScene> SpecimenScene for Rc<RefCell<T>> {
    fn update_visuals(&mut self, strain_percent: f64, force_kn: f64) {
        self.borrow_mut().update_visuals(strain_percent, force_kn);
    }

    fn should_trigger(&mut self, strain_percent: f64, uts_strain_percent: f64) -> bool {
        self.borrow_mut()
            .should_trigger(strain_percent, uts_strain_percent)
    }

    fn on_failure(&mut self) {
        self.borrow_mut().on_failure();
    }
}

/// Timing of the deformation clip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipTiming {
    pub total_duration_s: f64,
    /// Time of the clip's own rupture marker.
    pub rupture_event_time_s: f64,
    /// Parts animated in parallel; each reports its own loop end.
    pub animated_part_count: u32,
}

impl ClipTiming {
    pub fn new(
        total_duration_s: f64,
        rupture_event_time_s: f64,
        animated_part_count: u32,
    ) -> RigResult<Self> {
        if !total_duration_s.is_finite() || total_duration_s < 0.0 {
            return Err(RigError::Configuration(
                "clip total duration must be finite and >= 0".to_owned(),
            ));
        }
        if !rupture_event_time_s.is_finite() || rupture_event_time_s < 0.0 {
            return Err(RigError::Configuration(
                "clip rupture event time must be finite and >= 0".to_owned(),
            ));
        }
        Ok(Self {
            total_duration_s,
            rupture_event_time_s,
            animated_part_count,
        })
    }

    /// Normalized clip position of the rupture marker, or `None` when the clip
    /// has no usable length.
    #[must_use]
    pub fn rupture_ratio(self) -> Option<f64> {
        if self.total_duration_s <= f64::EPSILON {
            return None;
        }
        Some(self.rupture_event_time_s / self.total_duration_s)
    }
}

use super::{AnimationClock, SpecimenScene};

/// Headless animation clock used by tests and scene-less hosts.
///
/// It records the last command so playback decisions can be asserted without
/// an animation engine.
#[derive(Debug, Clone, PartialEq)]
pub struct NullAnimationClock {
    pub speed: f64,
    pub normalized_time: f64,
    pub restart_count: u32,
    pub scrub_count: u32,
}

impl Default for NullAnimationClock {
    fn default() -> Self {
        Self {
            speed: 0.0,
            normalized_time: 0.0,
            restart_count: 0,
            scrub_count: 0,
        }
    }
}

impl AnimationClock for NullAnimationClock {
    fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    fn scrub_to(&mut self, normalized_time: f64) {
        self.normalized_time = normalized_time;
        self.scrub_count += 1;
    }

    fn restart(&mut self) {
        self.normalized_time = 0.0;
        self.restart_count += 1;
    }
}

/// Scene with the default trigger predicate and no visuals.
#[derive(Debug, Default)]
pub struct NullSpecimenScene {
    pub failure_count: u32,
}

impl SpecimenScene for NullSpecimenScene {
    fn on_failure(&mut self) {
        self.failure_count += 1;
    }
}

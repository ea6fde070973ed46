use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::KeyPoints;
use crate::core::primitives::clamp01;
use crate::scene::{AnimationClock, ClipTiming, SpecimenScene};

use super::GraphState;

const SPAN_EPSILON: f64 = 1e-6;
const NEGLIGIBLE_TAIL_S: f64 = 1e-6;

/// Synchronizer flags, reset on `Idle` and on every new trigger.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnimationSyncState {
    pub triggered: bool,
    pub ruptured_on_graph_detected: bool,
    pub main_loop_finished: bool,
    pub post_rupture_elapsed_s: f64,
    pub post_rupture_duration_s: f64,
    pub finished_part_count: u32,
    pub completion_emitted: bool,
}

struct AnimationBinding {
    clock: Box<dyn AnimationClock>,
    scene: Box<dyn SpecimenScene>,
    timing: ClipTiming,
}

/// Maps plotted strain onto the deformation clip.
///
/// Between UTS and rupture the clip is scrubbed (speed 0) so the specimen
/// necks in step with the curve; once the curve crosses rupture the remaining
/// tail of the clip plays in real time.
pub struct AnimationSynchronizer {
    binding: Option<AnimationBinding>,
    state: AnimationSyncState,
    key_points: KeyPoints,
    paused: bool,
    post_rupture_fallback_s: f64,
}

impl AnimationSynchronizer {
    #[must_use]
    pub fn new(post_rupture_fallback_s: f64) -> Self {
        Self {
            binding: None,
            state: AnimationSyncState::default(),
            key_points: KeyPoints::default(),
            paused: false,
            post_rupture_fallback_s,
        }
    }

    pub fn bind(
        &mut self,
        clock: Box<dyn AnimationClock>,
        scene: Box<dyn SpecimenScene>,
        timing: ClipTiming,
    ) {
        debug!(
            total_duration_s = timing.total_duration_s,
            rupture_event_time_s = timing.rupture_event_time_s,
            animated_part_count = timing.animated_part_count,
            "animation bound"
        );
        self.binding = Some(AnimationBinding {
            clock,
            scene,
            timing,
        });
    }

    pub fn unbind(&mut self) -> bool {
        self.binding.take().is_some()
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    #[must_use]
    pub fn state(&self) -> AnimationSyncState {
        self.state
    }

    /// Starts a new run with fresh flags and the run's key points.
    pub fn arm(&mut self, key_points: KeyPoints) {
        self.state = AnimationSyncState::default();
        self.key_points = key_points;
        self.paused = false;
        if !key_points.is_complete() {
            debug!("key points incomplete; deformation animation disabled for this run");
        }
    }

    pub fn reset(&mut self) {
        self.state = AnimationSyncState::default();
        self.key_points = KeyPoints::default();
        self.paused = false;
    }

    pub fn on_state_changed(&mut self, graph_state: GraphState) {
        match graph_state {
            GraphState::Idle | GraphState::Preparing => self.reset(),
            GraphState::Paused => {
                self.paused = true;
                self.set_speed(0.0);
            }
            GraphState::Plotting => {
                self.paused = false;
                if self.tail_running() {
                    self.set_speed(1.0);
                }
            }
            GraphState::Ready | GraphState::Finished | GraphState::Error => {}
        }
    }

    /// Per emitted sample while plotting.
    pub fn observe_sample(&mut self, strain_percent: f64, force_kn: f64) {
        let Some(binding) = self.binding.as_mut() else {
            return;
        };

        if !self.state.main_loop_finished {
            binding.clock.set_speed(1.0);
        }
        binding.scene.update_visuals(strain_percent, force_kn);

        let Some((uts, rupture)) = self.key_points.uts_and_rupture() else {
            return;
        };

        if !self.state.triggered && binding.scene.should_trigger(strain_percent, uts) {
            self.state.triggered = true;
            self.state.ruptured_on_graph_detected = false;
            self.state.main_loop_finished = false;
            self.state.post_rupture_elapsed_s = 0.0;
            self.state.post_rupture_duration_s = 0.0;
            self.state.finished_part_count = 0;
            binding.clock.restart();
            debug!(strain_percent, uts, "deformation animation triggered");
        }

        if !self.state.triggered || self.state.ruptured_on_graph_detected {
            return;
        }

        if strain_percent >= rupture {
            self.state.ruptured_on_graph_detected = true;
            binding.clock.set_speed(1.0);
            binding.scene.on_failure();
            let duration = post_rupture_duration(binding.timing, self.post_rupture_fallback_s);
            self.state.post_rupture_duration_s = duration;
            self.state.post_rupture_elapsed_s = 0.0;
            debug!(
                strain_percent,
                rupture,
                post_rupture_duration_s = duration,
                "rupture reached on graph"
            );
        } else if strain_percent >= uts {
            let target = scrub_target(strain_percent, uts, rupture, binding.timing);
            binding.clock.set_speed(0.0);
            binding.clock.scrub_to(target);
            trace!(strain_percent, target, "clip scrubbed");
        }
    }

    /// Per frame: runs the post-rupture tail timer.
    pub fn advance(&mut self, dt_s: f64) {
        if !self.tail_running() || self.paused || dt_s <= 0.0 {
            return;
        }
        self.state.post_rupture_elapsed_s += dt_s;
        if self.state.post_rupture_elapsed_s >= self.state.post_rupture_duration_s {
            self.finish_main_loop("post-rupture tail elapsed");
        }
    }

    /// One animated part reported the end of its loop.
    pub fn notify_loop_ended(&mut self) {
        if !self.state.triggered || self.state.main_loop_finished {
            return;
        }
        self.state.finished_part_count += 1;
        let total = self.binding.as_ref().map_or(0, |b| b.timing.animated_part_count);
        if total > 0 && self.state.finished_part_count >= total {
            self.finish_main_loop("all animated parts finished");
        }
    }

    /// Returns `true` exactly once per run, when the run has completed.
    pub fn check_completion(&mut self, graph_state: GraphState) -> bool {
        if self.state.completion_emitted || graph_state != GraphState::Finished {
            return false;
        }
        let state = self.state;
        let complete = !state.triggered
            || state.main_loop_finished
            || (state.ruptured_on_graph_detected
                && state.post_rupture_duration_s <= NEGLIGIBLE_TAIL_S);
        if complete {
            self.state.completion_emitted = true;
        }
        complete
    }

    fn tail_running(&self) -> bool {
        self.state.ruptured_on_graph_detected && !self.state.main_loop_finished
    }

    fn finish_main_loop(&mut self, reason: &'static str) {
        self.state.main_loop_finished = true;
        self.set_speed(0.0);
        debug!(reason, "deformation main loop finished");
    }

    fn set_speed(&mut self, speed: f64) {
        if let Some(binding) = self.binding.as_mut() {
            binding.clock.set_speed(speed);
        }
    }
}

impl std::fmt::Debug for AnimationSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationSynchronizer")
            .field("bound", &self.binding.is_some())
            .field("state", &self.state)
            .field("key_points", &self.key_points)
            .field("paused", &self.paused)
            .finish()
    }
}

/// Normalized clip time for a strain between UTS and rupture. Only the part of
/// the clip before its own rupture marker is ever addressed.
#[must_use]
pub fn scrub_target(strain_percent: f64, uts: f64, rupture: f64, timing: ClipTiming) -> f64 {
    let span = rupture - uts;
    let progress = strain_percent - uts;
    let progress_norm = if span <= SPAN_EPSILON {
        if progress >= 0.0 { 1.0 } else { 0.0 }
    } else {
        clamp01(progress / span)
    };
    let rupture_ratio = timing.rupture_ratio().unwrap_or(1.0);
    clamp01(progress_norm * rupture_ratio)
}

/// Length of the clip tail after the rupture marker, in seconds.
///
/// Falls back to `fallback_s` when the clip has no tail, i.e. it has no
/// length or its rupture marker sits at or past the clip end.
#[must_use]
pub fn post_rupture_duration(timing: ClipTiming, fallback_s: f64) -> f64 {
    let tail = timing
        .rupture_ratio()
        .map(|ratio| timing.total_duration_s * (1.0 - ratio));
    match tail {
        Some(tail) if tail.is_finite() && tail > 0.0 => tail,
        _ => fallback_s,
    }
}

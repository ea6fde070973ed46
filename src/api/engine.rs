use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{KeyPoints, LineSegment, MaterialProfile, PlotSeries, SpecimenContext};
use crate::error::RigResult;
use crate::extensions::RigListener;
use crate::scene::{AnimationClock, ClipTiming, SpecimenScene};

use super::validation::validate_rig_config;
use super::{
    AnimationSyncState, AnimationSynchronizer, GraphState, PacingScheduler, PlaybackClock,
    PlaybackState, RigConfig, ThresholdEmitter, ThresholdFlags,
};

/// Specimen and material for one run, supplied with `prepare`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSetup {
    pub specimen: SpecimenContext,
    pub material: MaterialProfile,
}

impl TestSetup {
    #[must_use]
    pub fn new(specimen: SpecimenContext, material: MaterialProfile) -> Self {
        Self { specimen, material }
    }
}

/// Main orchestration facade consumed by host applications.
///
/// `TestRig` owns the pacing scheduler, the threshold emitter, the animation
/// synchronizer and the live plot series, and routes commands and per-frame
/// ticks between them. Collaborators (playback clock, animation clock,
/// specimen scene) are injected; nothing is looked up globally.
pub struct TestRig<C: PlaybackClock> {
    pub(super) config: RigConfig,
    pub(super) clock: C,
    pub(super) scheduler: PacingScheduler,
    pub(super) thresholds: ThresholdEmitter,
    pub(super) animation: AnimationSynchronizer,
    pub(super) plot: PlotSeries,
    pub(super) listeners: IndexMap<String, Box<dyn RigListener>>,
    pub(super) last_tick_s: Option<f64>,
}

impl<C: PlaybackClock> TestRig<C> {
    pub fn new(config: RigConfig, clock: C) -> RigResult<Self> {
        let config = validate_rig_config(config)?;
        Ok(Self {
            config,
            clock,
            scheduler: PacingScheduler::new(config.min_sample_delay_s),
            thresholds: ThresholdEmitter::new(
                config.machine_force_limit_kn,
                config.extensometer_attach_ratio,
                config.extensometer_detach_ratio,
            ),
            animation: AnimationSynchronizer::new(config.post_rupture_fallback_s),
            plot: PlotSeries::default(),
            listeners: IndexMap::new(),
            last_tick_s: None,
        })
    }

    /// Connects the scene's deformation clip. Replaces any earlier binding.
    pub fn attach_animation(
        &mut self,
        clock: Box<dyn AnimationClock>,
        scene: Box<dyn SpecimenScene>,
        timing: ClipTiming,
    ) {
        self.animation.bind(clock, scene, timing);
    }

    /// Returns `true` when a binding was removed.
    pub fn detach_animation(&mut self) -> bool {
        self.animation.unbind()
    }

    #[must_use]
    pub fn config(&self) -> RigConfig {
        self.config
    }

    #[must_use]
    pub fn state(&self) -> GraphState {
        self.scheduler.state()
    }

    #[must_use]
    pub fn playback(&self) -> PlaybackState {
        self.scheduler.playback()
    }

    #[must_use]
    pub fn threshold_flags(&self) -> ThresholdFlags {
        self.thresholds.flags()
    }

    #[must_use]
    pub fn key_points(&self) -> KeyPoints {
        self.scheduler
            .prepared_run()
            .map(|run| run.key_points)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn max_force_kn(&self) -> Option<f64> {
        self.scheduler.prepared_run().map(|run| run.max_force_kn)
    }

    #[must_use]
    pub fn animation_state(&self) -> AnimationSyncState {
        self.animation.state()
    }

    #[must_use]
    pub fn plot(&self) -> &PlotSeries {
        &self.plot
    }

    /// Plotted series projected into the configured plot viewport.
    pub fn plot_segments(&self) -> RigResult<Vec<LineSegment>> {
        self.plot.project_line_segments(self.config.plot_viewport)
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }
}

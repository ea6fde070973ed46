use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::core::{
    EffectiveSpeed, KeyPoints, MaterialProfile, ScaledSample, SpecimenContext,
    effective_speed_mm_per_min, find_key_points, scale_curve, stress_to_force_kn,
};
use crate::error::{RigError, RigResult};

/// Lifecycle of one simulated test run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GraphState {
    #[default]
    Idle,
    Preparing,
    Ready,
    Plotting,
    Paused,
    Finished,
    Error,
}

impl GraphState {
    /// States from which a fresh `Preparing` may begin.
    #[must_use]
    pub fn can_prepare(self) -> bool {
        matches!(self, Self::Idle | Self::Finished | Self::Error)
    }
}

/// Scheduler-owned progress, handed to observers as an immutable snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlaybackState {
    /// Index of the next sample to emit.
    pub current_index: usize,
    pub last_strain_percent: f64,
    pub last_force_kn: f64,
    pub state: GraphState,
}

/// Everything derived at preparation time for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRun {
    pub material_name: String,
    pub samples: Vec<ScaledSample>,
    pub max_force_kn: f64,
    pub max_strain_percent: f64,
    pub key_points: KeyPoints,
    pub speed: EffectiveSpeed,
    /// Wait after emitting each sample, in seconds.
    pub delays_s: Vec<f64>,
}

/// Output of scheduler commands, in emission order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackEvent {
    StateChanged(GraphState),
    MaxForceCalculated(f64),
    KeyPointsCalculated(KeyPoints),
    SamplePlotted {
        index: usize,
        sample: ScaledSample,
        playback: PlaybackState,
    },
}

pub type PlaybackEvents = SmallVec<[PlaybackEvent; 8]>;

/// Per-sample waits: the time the crosshead needs to cover each strain step
/// at `speed_mm_per_min`, floored at `min_delay_s`.
#[must_use]
pub fn compute_sample_delays(
    samples: &[ScaledSample],
    length_mm: f64,
    speed_mm_per_min: f64,
    min_delay_s: f64,
) -> Vec<f64> {
    let speed_mm_per_s = speed_mm_per_min / 60.0;
    let mut delays = Vec::with_capacity(samples.len());
    for index in 0..samples.len() {
        let delay = if index == 0 {
            min_delay_s
        } else {
            let strain_step = samples[index].strain_percent - samples[index - 1].strain_percent;
            let travel_mm = strain_step / 100.0 * length_mm;
            (travel_mm / speed_mm_per_s).max(min_delay_s)
        };
        delays.push(delay);
    }
    delays
}

/// Paces emission of a prepared run against a monotonic clock.
///
/// The scheduler never sleeps. Hosts call [`PacingScheduler::advance`] with the
/// current time and every sample whose wake time has passed is emitted in
/// order; the suspend point is the stored next wake time. While paused no wake
/// is pending at all.
#[derive(Debug)]
pub struct PacingScheduler {
    playback: PlaybackState,
    run: Option<PreparedRun>,
    next_wake_s: Option<f64>,
    paused_remaining_s: f64,
    min_delay_s: f64,
}

impl PacingScheduler {
    #[must_use]
    pub fn new(min_delay_s: f64) -> Self {
        Self {
            playback: PlaybackState::default(),
            run: None,
            next_wake_s: None,
            paused_remaining_s: 0.0,
            min_delay_s,
        }
    }

    #[must_use]
    pub fn state(&self) -> GraphState {
        self.playback.state
    }

    #[must_use]
    pub fn playback(&self) -> PlaybackState {
        self.playback
    }

    #[must_use]
    pub fn prepared_run(&self) -> Option<&PreparedRun> {
        self.run.as_ref()
    }

    /// Seconds until the next emission is due, `None` unless plotting.
    #[must_use]
    pub fn next_wake_in(&self, now_s: f64) -> Option<f64> {
        if self.playback.state != GraphState::Plotting {
            return None;
        }
        self.next_wake_s.map(|wake| (wake - now_s).max(0.0))
    }

    /// Validates inputs and derives the run. On failure the scheduler lands in
    /// `Error` and the error is returned; the emitted events still describe
    /// the transition.
    pub fn prepare(
        &mut self,
        specimen: SpecimenContext,
        material: &MaterialProfile,
        events: &mut PlaybackEvents,
    ) -> RigResult<()> {
        let state = self.playback.state;
        if !state.can_prepare() {
            return Err(RigError::InvalidCommand {
                command: "prepare",
                state,
            });
        }

        self.discard();
        self.transition(GraphState::Preparing, events);

        match self.build_run(specimen, material) {
            Ok(run) => {
                debug!(
                    material = %run.material_name,
                    samples = run.samples.len(),
                    max_force_kn = run.max_force_kn,
                    speed_mm_per_min = run.speed.mm_per_min,
                    "run prepared"
                );
                events.push(PlaybackEvent::MaxForceCalculated(run.max_force_kn));
                events.push(PlaybackEvent::KeyPointsCalculated(run.key_points));
                self.run = Some(run);
                self.transition(GraphState::Ready, events);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, material = %material.name, "run preparation failed");
                self.transition(GraphState::Error, events);
                Err(err)
            }
        }
    }

    /// `Ready` → `Plotting` from the first sample; `Paused` resumes.
    pub fn start(&mut self, now_s: f64, events: &mut PlaybackEvents) -> RigResult<()> {
        match self.playback.state {
            GraphState::Ready => {
                self.playback.current_index = 0;
                self.next_wake_s = Some(now_s);
                self.transition(GraphState::Plotting, events);
                Ok(())
            }
            GraphState::Paused => self.resume(now_s, events),
            state => Err(RigError::InvalidCommand {
                command: "start",
                state,
            }),
        }
    }

    pub fn pause(&mut self, now_s: f64, events: &mut PlaybackEvents) -> RigResult<()> {
        let state = self.playback.state;
        if state != GraphState::Plotting {
            return Err(RigError::InvalidCommand {
                command: "pause",
                state,
            });
        }
        self.paused_remaining_s = self
            .next_wake_s
            .take()
            .map_or(0.0, |wake| (wake - now_s).max(0.0));
        self.transition(GraphState::Paused, events);
        Ok(())
    }

    /// Continues at the same index, honouring the wait that was pending when
    /// the run was paused.
    pub fn resume(&mut self, now_s: f64, events: &mut PlaybackEvents) -> RigResult<()> {
        let state = self.playback.state;
        if state != GraphState::Paused {
            return Err(RigError::InvalidCommand {
                command: "resume",
                state,
            });
        }
        self.next_wake_s = Some(now_s + self.paused_remaining_s);
        self.paused_remaining_s = 0.0;
        self.transition(GraphState::Plotting, events);
        Ok(())
    }

    /// Discards the run from any state and returns to `Idle`.
    pub fn reset(&mut self, events: &mut PlaybackEvents) {
        self.discard();
        self.transition(GraphState::Idle, events);
    }

    /// Emits every sample due at `now_s`. Returns the number emitted.
    pub fn advance(&mut self, now_s: f64, events: &mut PlaybackEvents) -> usize {
        if self.playback.state != GraphState::Plotting {
            return 0;
        }
        let Some(run) = self.run.as_ref() else {
            return 0;
        };

        let mut emitted = 0;
        let mut finished = false;
        while let Some(wake) = self.next_wake_s {
            if now_s < wake {
                break;
            }

            let index = self.playback.current_index;
            let Some(sample) = run.samples.get(index).copied() else {
                self.next_wake_s = None;
                finished = true;
                debug!(samples = run.samples.len(), "playback finished");
                break;
            };

            self.playback.current_index = index + 1;
            self.playback.last_strain_percent = sample.strain_percent;
            self.playback.last_force_kn = sample.force_kn;
            events.push(PlaybackEvent::SamplePlotted {
                index,
                sample,
                playback: self.playback,
            });
            emitted += 1;

            let delay = run.delays_s.get(index).copied().unwrap_or(self.min_delay_s);
            self.next_wake_s = Some(wake + delay);
        }

        if finished {
            self.transition(GraphState::Finished, events);
        }
        if emitted > 0 {
            trace!(
                emitted,
                current_index = self.playback.current_index,
                "playback advanced"
            );
        }
        emitted
    }

    fn build_run(
        &self,
        specimen: SpecimenContext,
        material: &MaterialProfile,
    ) -> RigResult<PreparedRun> {
        let specimen = specimen.validate()?;
        let source = material.curve.as_ref().ok_or_else(|| {
            RigError::Configuration(format!("material `{}` has no curve source", material.name))
        })?;
        let curve = source.load()?;

        let scaled = scale_curve(&curve, &specimen, material.proportionality_limit_mpa);
        if scaled.samples.len() < 2 {
            return Err(RigError::DegenerateCurve {
                samples: scaled.samples.len(),
            });
        }

        let threshold_kn = if material.rupture_stress_threshold_mpa >= 0.0 {
            stress_to_force_kn(material.rupture_stress_threshold_mpa, specimen.area_mm2)
        } else {
            -1.0
        };
        let key_points = find_key_points(
            &scaled.samples,
            threshold_kn,
            scaled.proportionality_limit_kn,
        );

        let speed =
            effective_speed_mm_per_min(&specimen, key_points.uts_strain_percent, scaled.max_force_kn);
        if !speed.mm_per_min.is_finite() || speed.mm_per_min <= 0.0 {
            return Err(RigError::Configuration(format!(
                "effective speed must be finite and > 0 (received {})",
                speed.mm_per_min
            )));
        }

        let delays_s = compute_sample_delays(
            &scaled.samples,
            specimen.length_mm,
            speed.mm_per_min,
            self.min_delay_s,
        );

        Ok(PreparedRun {
            material_name: material.name.clone(),
            max_strain_percent: curve.raw_max_strain(),
            samples: scaled.samples,
            max_force_kn: scaled.max_force_kn,
            key_points,
            speed,
            delays_s,
        })
    }

    fn discard(&mut self) {
        self.run = None;
        self.next_wake_s = None;
        self.paused_remaining_s = 0.0;
        self.playback = PlaybackState {
            state: self.playback.state,
            ..PlaybackState::default()
        };
    }

    fn transition(&mut self, to: GraphState, events: &mut PlaybackEvents) {
        debug!(from = ?self.playback.state, to = ?to, "graph state transition");
        self.playback.state = to;
        events.push(PlaybackEvent::StateChanged(to));
    }
}

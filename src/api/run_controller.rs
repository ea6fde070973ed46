use tracing::{debug, trace, warn};

use crate::error::RigResult;
use crate::extensions::RigEvent;

use super::{
    GraphState, PlaybackClock, PlaybackEvent, PlaybackEvents, TestRig, TestSetup, ThresholdEvent,
};

impl<C: PlaybackClock> TestRig<C> {
    /// Enters `Preparing` and derives the run. Invalid input leaves the rig in
    /// `Error` and returns the cause.
    pub fn prepare(&mut self, setup: &TestSetup) -> RigResult<()> {
        let mut events = PlaybackEvents::new();
        let result = self
            .scheduler
            .prepare(setup.specimen, &setup.material, &mut events);
        self.process_playback_events(events);
        result
    }

    pub fn start(&mut self) -> RigResult<()> {
        let now = self.clock.now_seconds();
        let mut events = PlaybackEvents::new();
        self.scheduler.start(now, &mut events)?;
        self.last_tick_s = Some(now);
        self.process_playback_events(events);
        Ok(())
    }

    pub fn pause(&mut self) -> RigResult<()> {
        let now = self.clock.now_seconds();
        let mut events = PlaybackEvents::new();
        self.scheduler.pause(now, &mut events)?;
        self.process_playback_events(events);
        Ok(())
    }

    pub fn resume(&mut self) -> RigResult<()> {
        let now = self.clock.now_seconds();
        let mut events = PlaybackEvents::new();
        self.scheduler.resume(now, &mut events)?;
        self.last_tick_s = Some(now);
        self.process_playback_events(events);
        Ok(())
    }

    /// Cancels the run immediately from any state.
    pub fn reset(&mut self) {
        let mut events = PlaybackEvents::new();
        self.scheduler.reset(&mut events);
        self.last_tick_s = None;
        self.process_playback_events(events);
    }

    /// Drives one host frame: emits every due sample, runs the post-rupture
    /// tail timer and checks for completion. Returns the number of samples
    /// emitted.
    pub fn tick(&mut self) -> usize {
        let now = self.clock.now_seconds();
        let dt = self.last_tick_s.map_or(0.0, |last| (now - last).max(0.0));
        self.last_tick_s = Some(now);

        // The tail timer only accounts for frames after the rupture sample.
        self.animation.advance(dt);

        let mut events = PlaybackEvents::new();
        let emitted = self.scheduler.advance(now, &mut events);
        self.process_playback_events(events);

        self.emit_completion_if_ready();
        emitted
    }

    /// Seconds the host may sleep before the next sample is due.
    #[must_use]
    pub fn next_wake_in(&self) -> Option<f64> {
        self.scheduler.next_wake_in(self.clock.now_seconds())
    }

    /// Scene callback: one animated part finished its loop.
    pub fn notify_animation_loop_ended(&mut self) {
        self.animation.notify_loop_ended();
        self.emit_completion_if_ready();
    }

    fn process_playback_events(&mut self, events: PlaybackEvents) {
        for event in events {
            match event {
                PlaybackEvent::StateChanged(state) => self.handle_state_changed(state),
                PlaybackEvent::MaxForceCalculated(force_kn) => {
                    self.emit_event(RigEvent::MaxForceCalculated { force_kn });
                }
                PlaybackEvent::KeyPointsCalculated(key_points) => {
                    self.emit_event(RigEvent::KeyPointsCalculated {
                        uts_strain_percent: key_points.uts_strain_percent,
                        rupture_strain_percent: key_points.rupture_strain_percent,
                        proportionality_limit_kn: key_points.proportionality_limit_kn,
                    });
                }
                PlaybackEvent::SamplePlotted {
                    index,
                    sample,
                    playback,
                } => {
                    trace!(
                        index,
                        strain_percent = sample.strain_percent,
                        force_kn = sample.force_kn,
                        "sample plotted"
                    );
                    self.plot.push(sample.to_data_point());
                    let context = self.listener_context_with(playback);
                    self.dispatch(
                        RigEvent::SamplePlotted {
                            strain_percent: sample.strain_percent,
                            force_kn: sample.force_kn,
                        },
                        context,
                    );

                    for threshold_event in self.thresholds.evaluate(sample) {
                        let event = match threshold_event {
                            ThresholdEvent::ForceLimitExceeded => {
                                warn!(force_kn = sample.force_kn, "machine force limit exceeded");
                                RigEvent::ForceLimitExceeded
                            }
                            ThresholdEvent::Extensometer { attached, removed } => {
                                debug!(
                                    attached,
                                    removed,
                                    force_kn = sample.force_kn,
                                    "extensometer event"
                                );
                                RigEvent::ExtensometerEvent { attached, removed }
                            }
                        };
                        let context = self.listener_context_with(playback);
                        self.dispatch(event, context);
                    }

                    self.animation
                        .observe_sample(sample.strain_percent, sample.force_kn);
                }
            }
        }
    }

    fn handle_state_changed(&mut self, state: GraphState) {
        match state {
            GraphState::Idle | GraphState::Preparing => {
                self.thresholds.reset();
                self.plot.clear();
            }
            GraphState::Ready => {
                if let Some(run) = self.scheduler.prepared_run() {
                    self.thresholds.arm(run.max_force_kn);
                    self.animation.arm(run.key_points);
                    self.plot.prepare(run.max_strain_percent, run.max_force_kn);
                }
            }
            GraphState::Plotting
            | GraphState::Paused
            | GraphState::Finished
            | GraphState::Error => {}
        }
        self.animation.on_state_changed(state);
        self.emit_event(RigEvent::GraphStateChanged(state));
    }

    fn emit_completion_if_ready(&mut self) {
        if self.animation.check_completion(self.scheduler.state()) {
            debug!("test sequence completed");
            self.emit_event(RigEvent::TestSequenceCompleted);
        }
    }
}

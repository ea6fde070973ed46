use crate::extensions::{RigContext, RigEvent};

use super::{PlaybackClock, PlaybackState, TestRig};

impl<C: PlaybackClock> TestRig<C> {
    pub(super) fn listener_context(&self) -> RigContext {
        self.listener_context_with(self.scheduler.playback())
    }

    /// Context pinned to the playback snapshot of a single emission.
    pub(super) fn listener_context_with(&self, playback: PlaybackState) -> RigContext {
        let run = self.scheduler.prepared_run();
        RigContext {
            playback,
            flags: self.thresholds.flags(),
            key_points: run.map(|run| run.key_points).unwrap_or_default(),
            max_force_kn: run.map(|run| run.max_force_kn),
            sample_count: run.map_or(0, |run| run.samples.len()),
        }
    }

    pub(super) fn emit_event(&mut self, event: RigEvent) {
        let context = self.listener_context();
        self.dispatch(event, context);
    }

    pub(super) fn dispatch(&mut self, event: RigEvent, context: RigContext) {
        for listener in self.listeners.values_mut() {
            listener.on_event(event, context);
        }
    }
}

use super::{GraphState, PlaybackClock, RigSnapshot, TestRig, TestSummary};

impl<C: PlaybackClock> TestRig<C> {
    #[must_use]
    pub fn snapshot(&self) -> RigSnapshot {
        let run = self.scheduler.prepared_run();
        RigSnapshot {
            state: self.scheduler.state(),
            playback: self.scheduler.playback(),
            flags: self.thresholds.flags(),
            key_points: run.map(|run| run.key_points).unwrap_or_default(),
            max_force_kn: run.map(|run| run.max_force_kn),
            effective_speed: run.map(|run| run.speed),
            animation: self.animation.state(),
            sample_count: run.map_or(0, |run| run.samples.len()),
            plotted_points: self.plot.points().len(),
        }
    }

    /// Summary of the prepared run, `None` before a successful `prepare`.
    #[must_use]
    pub fn summary(&self) -> Option<TestSummary> {
        let run = self.scheduler.prepared_run()?;
        let flags = self.thresholds.flags();
        let animation = self.animation.state();
        Some(TestSummary {
            material: run.material_name.clone(),
            max_force_kn: run.max_force_kn,
            uts_strain_percent: run.key_points.uts_strain_percent,
            rupture_strain_percent: run.key_points.rupture_strain_percent,
            proportionality_limit_kn: run
                .key_points
                .proportionality_limit_kn
                .filter(|_| flags.extensometer_attached),
            extensometer_used: flags.extensometer_attached,
            force_limit_exceeded: flags.force_limit_exceeded,
            completed: self.scheduler.state() == GraphState::Finished
                && animation.completion_emitted,
        })
    }
}

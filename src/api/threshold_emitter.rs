use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::core::ScaledSample;

/// One-shot flags of a run. Each goes false→true at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ThresholdFlags {
    pub extensometer_attached: bool,
    pub extensometer_removed: bool,
    pub force_limit_exceeded: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThresholdEvent {
    ForceLimitExceeded,
    Extensometer { attached: bool, removed: bool },
}

/// Force levels checked against every emitted sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdLimits {
    pub machine_force_limit_kn: f64,
    pub attach_force_kn: f64,
    pub detach_force_kn: f64,
}

impl ThresholdLimits {
    #[must_use]
    pub fn from_ratios(
        machine_force_limit_kn: f64,
        max_force_kn: f64,
        attach_ratio: f64,
        detach_ratio: f64,
    ) -> Self {
        Self {
            machine_force_limit_kn,
            attach_force_kn: attach_ratio * max_force_kn,
            detach_force_kn: detach_ratio * max_force_kn,
        }
    }
}

/// Evaluates one sample against the flags and records any transition.
///
/// A sample that reaches both levels at once attaches and then removes the
/// instrument, in that order.
pub fn evaluate_thresholds(
    flags: &mut ThresholdFlags,
    sample: ScaledSample,
    limits: ThresholdLimits,
) -> SmallVec<[ThresholdEvent; 3]> {
    let mut events = SmallVec::new();

    if !flags.force_limit_exceeded && sample.force_kn > limits.machine_force_limit_kn {
        flags.force_limit_exceeded = true;
        events.push(ThresholdEvent::ForceLimitExceeded);
    }

    if !flags.extensometer_attached && sample.force_kn >= limits.attach_force_kn {
        flags.extensometer_attached = true;
        events.push(ThresholdEvent::Extensometer {
            attached: true,
            removed: false,
        });
    }

    if flags.extensometer_attached
        && !flags.extensometer_removed
        && sample.force_kn >= limits.detach_force_kn
    {
        flags.extensometer_removed = true;
        events.push(ThresholdEvent::Extensometer {
            attached: true,
            removed: true,
        });
    }

    events
}

/// Flag holder for the current run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdEmitter {
    flags: ThresholdFlags,
    limits: Option<ThresholdLimits>,
    machine_force_limit_kn: f64,
    attach_ratio: f64,
    detach_ratio: f64,
}

impl ThresholdEmitter {
    #[must_use]
    pub fn new(machine_force_limit_kn: f64, attach_ratio: f64, detach_ratio: f64) -> Self {
        Self {
            flags: ThresholdFlags::default(),
            limits: None,
            machine_force_limit_kn,
            attach_ratio,
            detach_ratio,
        }
    }

    /// Clears flags and derives the force levels for a new run.
    pub fn arm(&mut self, max_force_kn: f64) {
        self.flags = ThresholdFlags::default();
        let limits = ThresholdLimits::from_ratios(
            self.machine_force_limit_kn,
            max_force_kn,
            self.attach_ratio,
            self.detach_ratio,
        );
        debug!(
            attach_force_kn = limits.attach_force_kn,
            detach_force_kn = limits.detach_force_kn,
            machine_force_limit_kn = limits.machine_force_limit_kn,
            "threshold emitter armed"
        );
        self.limits = Some(limits);
    }

    pub fn reset(&mut self) {
        self.flags = ThresholdFlags::default();
        self.limits = None;
    }

    #[must_use]
    pub fn flags(&self) -> ThresholdFlags {
        self.flags
    }

    /// No events are produced until the emitter is armed.
    pub fn evaluate(&mut self, sample: ScaledSample) -> SmallVec<[ThresholdEvent; 3]> {
        match self.limits {
            Some(limits) => evaluate_thresholds(&mut self.flags, sample, limits),
            None => SmallVec::new(),
        }
    }
}

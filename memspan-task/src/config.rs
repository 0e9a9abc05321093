use std::time::Duration;

use memspan_core::TaskError;

use crate::generator::{MAX_SET_SIZE, MIN_SET_SIZE};

/// Fixed phase durations for one trial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseTimings {
    pub presentation: Duration,
    pub retention: Duration,
    pub probe: Duration,
    /// Response deadline. Defaults to the probe duration but is a separate
    /// knob: how long the probe stays on screen and how long the
    /// participant has to answer are unrelated concerns.
    pub response_window: Duration,
}

impl Default for PhaseTimings {
    fn default() -> Self {
        Self {
            presentation: Duration::from_secs(4),
            retention: Duration::from_secs(10),
            probe: Duration::from_secs(4),
            response_window: Duration::from_secs(4),
        }
    }
}

/// Run-level configuration handed to the engine at construction.
#[derive(Debug, Clone)]
pub struct TaskConfig {
    pub trials_per_run: usize,
    /// Inclusive bounds for the per-trial set cardinality.
    pub set_size_range: (usize, usize),
    pub timings: PhaseTimings,
    /// Probability that the probe is drawn from outside the shown set.
    /// Zero reproduces the always-member design of the original task.
    pub foil_probability: f64,
    /// Input poll cadence during the response window.
    pub poll_interval: Duration,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            trials_per_run: 12,
            set_size_range: (MIN_SET_SIZE, MAX_SET_SIZE),
            timings: PhaseTimings::default(),
            foil_probability: 0.0,
            poll_interval: Duration::from_millis(10),
        }
    }
}

impl TaskConfig {
    pub fn validate(&self) -> Result<(), TaskError> {
        if self.trials_per_run == 0 {
            return Err(TaskError::Configuration(
                "a run needs at least one trial".into(),
            ));
        }
        let (lo, hi) = self.set_size_range;
        if lo < MIN_SET_SIZE || hi > MAX_SET_SIZE || lo > hi {
            return Err(TaskError::Configuration(format!(
                "set size range must lie within {MIN_SET_SIZE}..={MAX_SET_SIZE}, got {lo}..={hi}"
            )));
        }
        let t = &self.timings;
        for (name, d) in [
            ("presentation", t.presentation),
            ("retention", t.retention),
            ("probe", t.probe),
            ("response window", t.response_window),
            ("poll interval", self.poll_interval),
        ] {
            if d.is_zero() {
                return Err(TaskError::Configuration(format!(
                    "{name} duration must be positive"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.foil_probability) {
            return Err(TaskError::Configuration(format!(
                "foil probability must lie in [0, 1], got {}",
                self.foil_probability
            )));
        }
        Ok(())
    }
}

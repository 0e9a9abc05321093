use serde::{Deserialize, Serialize};

use crate::stimulus::StimulusSet;

/// Per-trial state machine. States run in strict forward order with no
/// branching back; a trial is scored exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialState {
    Presentation,
    Retention,
    Probe,
    Response,
    Complete,
}

/// Scored record of one trial, created when the response is classified and
/// never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialOutcome {
    /// 1-based index within the run.
    pub trial_index: usize,
    pub set: StimulusSet,
    pub probe: String,
    pub probe_is_member: bool,
    /// The participant's judgement: true = "probe was in the set".
    pub response: bool,
    /// Seconds from response-window open to the keystroke (or the full
    /// deadline on timeout).
    pub response_time_s: f64,
    pub correct: bool,
}

/// Accumulated record of one run, finalized when all trials complete.
///
/// Invariant: `correct + incorrect == outcomes.len()`, and
/// `response_times` parallels `outcomes`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub outcomes: Vec<TrialOutcome>,
    pub correct: u32,
    pub incorrect: u32,
    pub response_times: Vec<f64>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: TrialOutcome) {
        if outcome.correct {
            self.correct += 1;
        } else {
            self.incorrect += 1;
        }
        self.response_times.push(outcome.response_time_s);
        self.outcomes.push(outcome);
    }

    pub fn trial_count(&self) -> usize {
        self.outcomes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stimulus::DigitLength;

    fn outcome(correct: bool, rt: f64) -> TrialOutcome {
        TrialOutcome {
            trial_index: 1,
            set: StimulusSet::new(vec!["5".into()], DigitLength::One),
            probe: "5".into(),
            probe_is_member: true,
            response: correct,
            response_time_s: rt,
            correct,
        }
    }

    #[test]
    fn counters_track_outcomes() {
        let mut summary = RunSummary::new();
        summary.record(outcome(true, 0.8));
        summary.record(outcome(false, 1.2));
        summary.record(outcome(true, 0.5));

        assert_eq!(summary.trial_count(), 3);
        assert_eq!(summary.correct + summary.incorrect, 3);
        assert_eq!(summary.response_times, vec![0.8, 1.2, 0.5]);
    }
}

//! The trial engine: generates stimuli, drives timed phases, classifies
//! responses and accumulates the run summary.

use memspan_core::{DigitLength, RunSummary, TaskError, TaskView, TrialOutcome, TrialState};
use memspan_timing::Timer;
use rand::Rng;

use crate::classifier::{Response, ResponseClassifier};
use crate::config::TaskConfig;
use crate::generator;
use crate::io::{Display, InputSource, KeyInput};

/// Runs complete trials in a strict phase sequence on one blocking control
/// thread. Owns the growing [`RunSummary`] for the lifetime of a run and
/// hands it off immutably when done.
pub struct TrialEngine<T: Timer, R: Rng> {
    config: TaskConfig,
    timer: T,
    rng: R,
    classifier: ResponseClassifier,
}

impl<T: Timer, R: Rng> TrialEngine<T, R> {
    pub fn new(config: TaskConfig, timer: T, rng: R) -> Self {
        let classifier = ResponseClassifier::new(config.poll_interval);
        Self {
            config,
            timer,
            rng,
            classifier,
        }
    }

    pub fn config(&self) -> &TaskConfig {
        &self.config
    }

    /// Runs `num_trials` trials and returns the finalized summary.
    ///
    /// Ends early, with the trials scored so far, when the participant
    /// quits; the quit signal is only checked between trials since phase
    /// waits are not interruptible. Collaborator failures abort the run.
    pub fn run<D: Display, I: InputSource>(
        &mut self,
        display: &mut D,
        input: &mut I,
        num_trials: usize,
    ) -> Result<RunSummary, TaskError> {
        if num_trials == 0 {
            return Err(TaskError::Configuration(
                "a run needs at least one trial".into(),
            ));
        }
        self.config.validate()?;

        let mut summary = RunSummary::new();
        for trial_index in 1..=num_trials {
            if drain_for_quit(input) {
                break;
            }
            let quit = self.run_trial(trial_index, display, input, &mut summary)?;
            if quit {
                break;
            }
        }
        println!(
            "Run complete: {}/{} correct",
            summary.correct,
            summary.trial_count()
        );
        Ok(summary)
    }

    /// One full trial: generate, present, retain, probe, classify, score.
    /// Returns whether a quit arrived during the response window.
    fn run_trial<D: Display, I: InputSource>(
        &mut self,
        trial_index: usize,
        display: &mut D,
        input: &mut I,
        summary: &mut RunSummary,
    ) -> Result<bool, TaskError> {
        let digit_length = DigitLength::for_trial(trial_index);
        let (lo, hi) = self.config.set_size_range;
        let length = self.rng.random_range(lo..=hi);
        let set = generator::generate_set(&mut self.rng, length, digit_length)?;
        let probe = generator::pick_probe(&mut self.rng, &set, self.config.foil_probability);

        let timings = self.config.timings;
        let mut state = TrialState::Presentation;
        let response: Response = loop {
            match state {
                TrialState::Presentation => {
                    display.show(TaskView::StimulusSet(set.items().to_vec()))?;
                    self.timer.sleep(timings.presentation);
                    state = TrialState::Retention;
                }
                TrialState::Retention => {
                    display.show(TaskView::Blank)?;
                    self.timer.sleep(timings.retention);
                    state = TrialState::Probe;
                }
                TrialState::Probe => {
                    display.show(TaskView::Probe(probe.value.clone()))?;
                    self.timer.sleep(timings.probe);
                    state = TrialState::Response;
                }
                TrialState::Response => {
                    break self
                        .classifier
                        .classify(&self.timer, input, timings.response_window);
                }
                TrialState::Complete => unreachable!("response breaks the loop before Complete"),
            }
        };

        // Scored exactly once, whatever the input quality was.
        let correct = response.answer == probe.is_member;
        println!(
            "Trial {trial_index}: {} in {:.3}s",
            if correct { "correct" } else { "incorrect" },
            response.elapsed_s
        );
        summary.record(TrialOutcome {
            trial_index,
            set,
            probe: probe.value,
            probe_is_member: probe.is_member,
            response: response.answer,
            response_time_s: response.elapsed_s,
            correct,
        });
        Ok(response.quit_requested)
    }
}

/// Drains whatever is pending between trials; only a quit key matters here.
fn drain_for_quit<I: InputSource>(input: &mut I) -> bool {
    let mut quit = false;
    while let Some(key) = input.poll() {
        if key == KeyInput::Quit {
            quit = true;
        }
    }
    quit
}

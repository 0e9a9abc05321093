//! Response collection: maps keystrokes (or silence) to a judgement and a
//! latency.

use std::time::Duration;

use memspan_timing::Timer;

use crate::io::{InputSource, KeyInput};

/// Outcome of one response window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Response {
    /// true = "the probe was in the set".
    pub answer: bool,
    /// Seconds from window open to the keystroke, clamped to the deadline;
    /// exactly the deadline on timeout.
    pub elapsed_s: f64,
    pub timed_out: bool,
    /// A quit key arrived during the window. The engine honors it after
    /// scoring, never mid-phase.
    pub quit_requested: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct ResponseClassifier {
    poll_interval: Duration,
}

impl ResponseClassifier {
    pub fn new(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }

    /// Blocks until a definitive answer or the deadline.
    ///
    /// Every queued event is drained each tick, so stray keystrokes cannot
    /// leak into the next trial. The first affirm/deny wins; a deadline with
    /// no input scores as an implicit "not in the set", never as a separate
    /// timeout category.
    pub fn classify<T: Timer, I: InputSource>(
        &self,
        timer: &T,
        input: &mut I,
        deadline: Duration,
    ) -> Response {
        let opened = timer.now();
        let mut quit_requested = false;
        loop {
            let mut answer = None;
            while let Some(key) = input.poll() {
                match key {
                    KeyInput::Affirm if answer.is_none() => answer = Some(true),
                    KeyInput::Deny if answer.is_none() => answer = Some(false),
                    KeyInput::Quit => quit_requested = true,
                    _ => {}
                }
            }

            let elapsed = timer.elapsed(opened);
            if let Some(answer) = answer {
                return Response {
                    answer,
                    elapsed_s: elapsed.min(deadline).as_secs_f64(),
                    timed_out: false,
                    quit_requested,
                };
            }
            if elapsed >= deadline {
                return Response {
                    answer: false,
                    elapsed_s: deadline.as_secs_f64(),
                    timed_out: true,
                    quit_requested,
                };
            }
            timer.sleep(self.poll_interval);
        }
    }
}

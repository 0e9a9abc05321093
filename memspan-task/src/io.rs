//! Collaborator boundaries: input polling and display output.
//!
//! The engine only ever sees these traits; keyboard mechanics and screen
//! layout live behind them in the front-end.

use std::collections::VecDeque;

use memspan_core::{TaskError, TaskView};

/// Logical key events the task cares about. Anything else a front-end
/// receives is ignored before it gets here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// "The probe was in the set."
    Affirm,
    /// "The probe was not in the set."
    Deny,
    /// End the session; honored between trials, never mid-phase.
    Quit,
}

/// Input collaborator: at most one pending key per poll, `None` when idle.
pub trait InputSource {
    fn poll(&mut self) -> Option<KeyInput>;
}

/// Display collaborator, fire and forget.
pub trait Display {
    fn show(&mut self, view: TaskView) -> Result<(), TaskError>;
}

/// Queue-backed input source for tests and headless simulations. A `None`
/// entry models one idle poll tick.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    queue: VecDeque<Option<KeyInput>>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(mut self, key: KeyInput) -> Self {
        self.queue.push_back(Some(key));
        self
    }

    pub fn idle(mut self, ticks: usize) -> Self {
        for _ in 0..ticks {
            self.queue.push_back(None);
        }
        self
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Option<KeyInput> {
        self.queue.pop_front().flatten()
    }
}

/// Display that records everything it was asked to show.
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    pub views: Vec<TaskView>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Display for RecordingDisplay {
    fn show(&mut self, view: TaskView) -> Result<(), TaskError> {
        self.views.push(view);
        Ok(())
    }
}

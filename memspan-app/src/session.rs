//! Bridge between the windowed front-end and the blocking trial engine.
//!
//! The engine runs on a worker thread and never touches winit. Views flow
//! out over one channel, key presses flow in over another; both ends are
//! non-blocking so neither thread can stall the other.

use std::fs::File;
use std::sync::mpsc::{Receiver, Sender};

use anyhow::{Context, Result};
use memspan_core::{TaskError, TaskView};
use memspan_record::RunRecorder;
use memspan_task::{Display, InputSource, KeyInput, RunStats, TaskConfig, TrialEngine};
use memspan_timing::HighPrecisionTimer;

pub const RESULTS_CSV: &str = "sternberg_results.csv";
pub const LAST_RUN_JSON: &str = "sternberg_last_run.json";

/// Pushes views to the render thread. A hung-up receiver means the window
/// closed under us, which the engine surfaces as a collaborator failure.
pub struct ChannelDisplay {
    tx: Sender<TaskView>,
}

impl ChannelDisplay {
    pub fn new(tx: Sender<TaskView>) -> Self {
        Self { tx }
    }
}

impl Display for ChannelDisplay {
    fn show(&mut self, view: TaskView) -> Result<(), TaskError> {
        self.tx
            .send(view)
            .map_err(|_| TaskError::Collaborator("display channel closed".into()))
    }
}

/// Drains key presses forwarded by the event loop.
pub struct ChannelInput {
    rx: Receiver<KeyInput>,
}

impl ChannelInput {
    pub fn new(rx: Receiver<KeyInput>) -> Self {
        Self { rx }
    }
}

impl InputSource for ChannelInput {
    fn poll(&mut self) -> Option<KeyInput> {
        self.rx.try_recv().ok()
    }
}

/// One complete run: trials, statistics, CSV append, JSON dump, results
/// screen. Runs to completion on the worker thread.
pub fn run_session(view_tx: Sender<TaskView>, key_rx: Receiver<KeyInput>) -> Result<()> {
    let config = TaskConfig::default();
    let trials = config.trials_per_run;
    let mut engine = TrialEngine::new(config, HighPrecisionTimer::new(), rand::rng());

    let mut display = ChannelDisplay::new(view_tx.clone());
    let mut input = ChannelInput::new(key_rx);
    let summary = engine.run(&mut display, &mut input, trials)?;

    if summary.response_times.len() < 2 {
        println!("Too few trials completed for statistics; nothing recorded.");
        let _ = view_tx.send(TaskView::Results {
            correct: summary.correct,
            incorrect: summary.incorrect,
            accuracy: 0.0,
            mean_rt_s: 0.0,
        });
        return Ok(());
    }

    let stats = RunStats::from_summary(&summary)?;

    let recorder = RunRecorder::new(RESULTS_CSV);
    let run_index = recorder.append(&summary, &stats)?;
    println!("Run {run_index} appended to {}", recorder.path().display());

    let file = File::create(LAST_RUN_JSON).context("create last-run dump")?;
    serde_json::to_writer_pretty(file, &summary.outcomes).context("write last-run dump")?;

    view_tx
        .send(TaskView::Results {
            correct: summary.correct,
            incorrect: summary.incorrect,
            accuracy: stats.accuracy,
            mean_rt_s: stats.latency.mean,
        })
        .ok();

    Ok(())
}

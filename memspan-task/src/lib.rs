pub mod classifier;
pub mod config;
pub mod engine;
pub mod generator;
pub mod io;
pub mod stats;

pub use classifier::{Response, ResponseClassifier};
pub use config::{PhaseTimings, TaskConfig};
pub use engine::TrialEngine;
pub use io::{Display, InputSource, KeyInput, RecordingDisplay, ScriptedInput};
pub use stats::{LatencyStats, RunStats};

pub mod recorder;

pub use recorder::{COLUMNS, RunRecorder};

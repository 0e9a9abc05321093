//! Error taxonomy for the task.
//!
//! Everything surfaces to the top-level run loop; nothing is recovered
//! mid-trial. A failed run aborts the session.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskError {
    /// Invalid digit-length class, trial count, or phase duration handed to
    /// the engine or generator.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Statistics requested on a latency sequence too short to support them.
    #[error("not enough samples for statistics: got {samples}, need at least {required}")]
    InsufficientData { samples: usize, required: usize },

    /// The record destination could not be read or written.
    #[error("record destination error: {0}")]
    Persistence(#[from] std::io::Error),

    /// A display or input collaborator misbehaved.
    #[error("collaborator failure: {0}")]
    Collaborator(String),
}

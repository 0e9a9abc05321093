pub mod error;
pub mod stimulus;
pub mod trial;
pub mod view;

pub use error::TaskError;
pub use stimulus::{DigitLength, Probe, StimulusSet};
pub use trial::{RunSummary, TrialOutcome, TrialState};
pub use view::TaskView;

/// What the engine asks the display collaborator to show.
///
/// The engine never owns a drawing surface; it names content and positions
/// are the renderer's business.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskView {
    Instructions(Vec<String>),
    StimulusSet(Vec<String>),
    Blank,
    Probe(String),
    Results {
        correct: u32,
        incorrect: u32,
        accuracy: f64,
        mean_rt_s: f64,
    },
}

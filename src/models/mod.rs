pub mod gaze;
pub mod record;
pub mod sample;
pub mod stress;

pub use gaze::{GazePoint, GazeSummary};
pub use record::{assemble, CandidateRecord};
pub use sample::Sample;
pub use stress::{ClassificationResult, StressLabel};

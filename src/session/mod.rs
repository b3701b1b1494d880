pub mod buffer;
pub mod commands;
pub mod controller;
pub mod state;

pub use buffer::SampleBuffer;
pub use controller::{IngestOutcome, SessionConfig, SessionController, StopOutcome};
pub use state::{SessionSnapshot, SessionState, SessionStatus};

pub mod commands;
pub mod controller;
pub mod loop_worker;
pub mod source;
pub mod tracker;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::GazeSummary;

pub use controller::FrameLoop;
pub use source::{FrameSource, SyntheticSource};
pub use tracker::FrameGazeTracker;

/// Start/stop contract of the gaze collaborator. Starting while a capture is
/// in progress restarts it.
#[async_trait]
pub trait GazeTracker: Send + Sync {
    async fn start(&self, label: Option<&str>) -> Result<()>;

    async fn stop(&self) -> Result<GazeSummary>;

    async fn is_logging(&self) -> bool;
}

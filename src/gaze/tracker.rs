use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use log::{info, warn};
use tokio::sync::Mutex;

use crate::{
    error::GazeNotActive,
    models::{GazePoint, GazeSummary},
};

use super::GazeTracker;

struct Capture {
    label: Option<String>,
    points: Vec<GazePoint>,
}

#[derive(Default)]
struct TrackerState {
    capture: Option<Capture>,
}

/// Gaze tracker fed by the background frame loop. Frames arriving while no
/// capture is running are dropped.
#[derive(Clone, Default)]
pub struct FrameGazeTracker {
    state: Arc<Mutex<TrackerState>>,
}

impl FrameGazeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record_frame(&self, point: GazePoint) {
        if let Some(capture) = self.state.lock().await.capture.as_mut() {
            capture.points.push(point);
        }
    }
}

#[async_trait]
impl GazeTracker for FrameGazeTracker {
    async fn start(&self, label: Option<&str>) -> Result<()> {
        let mut state = self.state.lock().await;
        if let Some(previous) = state.capture.take() {
            warn!(
                "Restarting gaze capture; discarding {} frames from {:?}",
                previous.points.len(),
                previous.label
            );
        }

        state.capture = Some(Capture {
            label: label.map(str::to_string),
            points: Vec::new(),
        });
        info!("Gaze logging started for {:?}", label);
        Ok(())
    }

    async fn stop(&self) -> Result<GazeSummary> {
        let capture = {
            let mut state = self.state.lock().await;
            match state.capture.take() {
                Some(capture) => capture,
                None => return Err(GazeNotActive.into()),
            }
        };

        let summary = GazeSummary::from_points(capture.points);
        info!(
            "Gaze logging stopped for {:?}: {} frames, focus index {:.2}",
            capture.label,
            summary.gaze_patterns.len(),
            summary.focus_index
        );
        Ok(summary)
    }

    async fn is_logging(&self) -> bool {
        self.state.lock().await.capture.is_some()
    }
}

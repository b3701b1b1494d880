use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One gaze frame in normalized screen coordinates (0..1 on both axes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GazePoint {
    pub x: f32,
    pub y: f32,
    pub on_target: bool,
    pub captured_at: DateTime<Utc>,
}

/// Result of a finished gaze capture. Opaque to the session core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GazeSummary {
    pub gaze_patterns: Vec<GazePoint>,
    /// Percentage of frames that were on target.
    pub focus_index: f64,
}

impl GazeSummary {
    pub fn from_points(points: Vec<GazePoint>) -> Self {
        let focus_index = if points.is_empty() {
            0.0
        } else {
            let on_target = points.iter().filter(|p| p.on_target).count();
            let raw = on_target as f64 * 100.0 / points.len() as f64;
            (raw * 100.0).round() / 100.0
        };

        Self {
            gaze_patterns: points,
            focus_index,
        }
    }
}

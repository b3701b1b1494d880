//! Candidate record model and assembler.
//!
//! A `CandidateRecord` is the unit handed to persistence once per completed
//! session. The gaze fields keep their snake_case names from the original
//! document layout.

use serde::{Deserialize, Serialize};

use super::{ClassificationResult, GazePoint, GazeSummary, Sample, StressLabel};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    pub candidate_id: String,
    pub average_stress: String,
    pub stress_status: StressLabel,
    pub biometrics: Vec<Sample>,
    #[serde(
        rename = "gaze_patterns",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub gaze_patterns: Option<Vec<GazePoint>>,
    #[serde(
        rename = "focus_index",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub focus_index: Option<f64>,
}

/// Build the record for a finished session. Pure: identical inputs give
/// identical records.
pub fn assemble(
    candidate_id: &str,
    result: &ClassificationResult,
    samples: &[Sample],
    gaze: Option<&GazeSummary>,
) -> CandidateRecord {
    CandidateRecord {
        candidate_id: candidate_id.to_string(),
        average_stress: result.average_stress(),
        stress_status: result.label,
        biometrics: samples.to_vec(),
        gaze_patterns: gaze.map(|g| g.gaze_patterns.clone()),
        focus_index: gaze.map(|g| g.focus_index),
    }
}

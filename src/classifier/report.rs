use serde::Serialize;

use crate::{
    error::ClassifyError,
    models::{ClassificationResult, StressLabel},
};

/// The `stress_result` payload returned to callers. Classification failures
/// travel here with `status: "failure"` rather than as an HTTP error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StressReport {
    Success {
        stress: StressLabel,
        average_stress: String,
    },
    Failure {
        message: String,
    },
}

impl From<&Result<ClassificationResult, ClassifyError>> for StressReport {
    fn from(result: &Result<ClassificationResult, ClassifyError>) -> Self {
        match result {
            Ok(result) => StressReport::Success {
                stress: result.label,
                average_stress: result.average_stress(),
            },
            Err(err) => StressReport::Failure {
                message: err.to_string(),
            },
        }
    }
}

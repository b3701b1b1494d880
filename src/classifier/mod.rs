//! Stress classification over a finished session's samples.

pub mod model;
pub mod report;

pub use model::LinearStressModel;
pub use report::StressReport;

use anyhow::{bail, Result};

use crate::{
    error::ClassifyError,
    models::{ClassificationResult, Sample},
};

pub const MIN_TEMPERATURE: f64 = 26.0;
pub const MAX_TEMPERATURE: f64 = 38.0;

/// A fitted model producing one stress prediction per feature row.
///
/// Predictions are class indices in `0..=2`; the aggregate divides by `2n`
/// to land on a 0..1 scale.
pub trait StressModel: Send + Sync {
    /// Input columns in training order.
    fn feature_names(&self) -> &[String];

    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    HeartRate,
    Temperature,
}

impl Feature {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "HR" | "heart_rate" | "bpm" => Some(Feature::HeartRate),
            "TEMP" | "temperature" => Some(Feature::Temperature),
            _ => None,
        }
    }

    fn value(&self, sample: &Sample) -> f64 {
        match self {
            Feature::HeartRate => sample.heart_rate,
            Feature::Temperature => sample.temperature,
        }
    }
}

/// Build the model input matrix: one row per sample, timestamp dropped,
/// columns in the order given by `feature_names`.
pub fn extract_features(samples: &[Sample], feature_names: &[String]) -> Result<Vec<Vec<f64>>> {
    let mut columns = Vec::with_capacity(feature_names.len());
    for name in feature_names {
        match Feature::from_name(name) {
            Some(feature) => columns.push(feature),
            None => bail!("model expects unknown feature '{name}'"),
        }
    }

    Ok(samples
        .iter()
        .map(|sample| columns.iter().map(|f| f.value(sample)).collect())
        .collect())
}

pub fn temperature_in_range(temperature: f64) -> bool {
    (MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&temperature)
}

pub fn classify(
    model: &dyn StressModel,
    samples: &[Sample],
) -> std::result::Result<ClassificationResult, ClassifyError> {
    if samples.is_empty() {
        return Err(ClassifyError::InsufficientData);
    }

    if samples.iter().any(|s| !temperature_in_range(s.temperature)) {
        return Err(ClassifyError::OutOfRangeInput);
    }

    let rows = extract_features(samples, model.feature_names()).map_err(ClassifyError::Model)?;
    let predictions = model.predict(&rows).map_err(ClassifyError::Model)?;

    if predictions.len() != samples.len() {
        return Err(ClassifyError::ModelMismatch(format!(
            "expected {} predictions, got {}",
            samples.len(),
            predictions.len()
        )));
    }
    if let Some(bad) = predictions.iter().find(|p| !p.is_finite()) {
        return Err(ClassifyError::ModelMismatch(format!(
            "non-finite prediction {bad}"
        )));
    }

    let n = predictions.len() as f64;
    let avg_stress = predictions.iter().sum::<f64>() / (2.0 * n);

    Ok(ClassificationResult::from_score(avg_stress))
}

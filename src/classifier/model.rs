use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

use super::{Feature, StressModel};

/// Highest stress class; keeps `sum / 2n` within 0..=1.
const MAX_LABEL: f64 = 2.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassWeights {
    /// Predicted value emitted when this class wins.
    pub label: f64,
    pub weights: Vec<f64>,
    pub bias: f64,
}

/// Multinomial linear classifier: each row is assigned the label of the
/// class with the highest `weights · row + bias`. Ties go to the earlier class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearStressModel {
    features: Vec<String>,
    classes: Vec<ClassWeights>,
}

impl LinearStressModel {
    pub fn new(features: Vec<String>, classes: Vec<ClassWeights>) -> Result<Self> {
        let model = Self { features, classes };
        model.validate()?;
        Ok(model)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read model artifact {}", path.display()))?;
        let model: LinearStressModel = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse model artifact {}", path.display()))?;
        model.validate()?;

        info!(
            "Loaded stress model from {} ({} features, {} classes)",
            path.display(),
            model.features.len(),
            model.classes.len()
        );
        Ok(model)
    }

    fn validate(&self) -> Result<()> {
        if self.features.is_empty() {
            bail!("model declares no features");
        }
        if self.classes.is_empty() {
            bail!("model declares no classes");
        }
        for name in &self.features {
            if Feature::from_name(name).is_none() {
                bail!("model declares unknown feature '{name}'");
            }
        }
        for (idx, class) in self.classes.iter().enumerate() {
            if !(0.0..=MAX_LABEL).contains(&class.label) {
                bail!(
                    "class {idx} has label {} outside 0..={MAX_LABEL}",
                    class.label
                );
            }
            if class.weights.len() != self.features.len() {
                bail!(
                    "class {idx} has {} weights for {} features",
                    class.weights.len(),
                    self.features.len()
                );
            }
        }
        Ok(())
    }

    fn predict_row(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.features.len() {
            bail!(
                "row has {} values, model expects {}",
                row.len(),
                self.features.len()
            );
        }

        let mut best: Option<(f64, f64)> = None;
        for class in &self.classes {
            let score = class
                .weights
                .iter()
                .zip(row)
                .map(|(w, x)| w * x)
                .sum::<f64>()
                + class.bias;
            match best {
                Some((best_score, _)) if score <= best_score => {}
                _ => best = Some((score, class.label)),
            }
        }

        best.map(|(_, label)| label)
            .ok_or_else(|| anyhow::anyhow!("model has no classes"))
    }
}

impl StressModel for LinearStressModel {
    fn feature_names(&self) -> &[String] {
        &self.features
    }

    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>> {
        rows.iter().map(|row| self.predict_row(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{classifier::classify, classifier::tests::samples_with_temps, models::StressLabel};

    fn bundled_artifact() -> &'static str {
        include_str!("../../artifacts/model_stress.json")
    }

    fn threshold_model() -> LinearStressModel {
        // Temperature-only: below 31 → 0, 31..34 → 1, above 34 → 2.
        LinearStressModel::new(
            vec!["TEMP".into()],
            vec![
                ClassWeights { label: 0.0, weights: vec![0.0], bias: 0.0 },
                ClassWeights { label: 1.0, weights: vec![1.0], bias: -31.0 },
                ClassWeights { label: 2.0, weights: vec![2.0], bias: -65.0 },
            ],
        )
        .unwrap()
    }

    #[test]
    fn picks_highest_scoring_class() {
        let model = threshold_model();
        let predictions = model
            .predict(&[vec![29.0], vec![32.0], vec![36.0]])
            .unwrap();
        assert_eq!(predictions, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn ties_go_to_earlier_class() {
        let model = threshold_model();
        assert_eq!(model.predict(&[vec![31.0]]).unwrap(), vec![0.0]);
    }

    #[test]
    fn classifies_session_through_model() {
        let model = threshold_model();
        let result = classify(&model, &samples_with_temps(&[30.0, 31.0, 29.0, 32.0])).unwrap();
        // predictions [0, 0, 0, 1] → 1 / 8
        assert_eq!(result.score, 0.125);
        assert_eq!(result.label, StressLabel::Resilient);
        assert_eq!(result.average_stress(), "12.50%");
    }

    #[test]
    fn rejects_mismatched_weights() {
        let err = LinearStressModel::new(
            vec!["HR".into(), "TEMP".into()],
            vec![ClassWeights { label: 0.0, weights: vec![1.0], bias: 0.0 }],
        )
        .unwrap_err();
        assert!(err.to_string().contains("weights"));
    }

    #[test]
    fn rejects_unknown_features() {
        assert!(LinearStressModel::new(
            vec!["EDA".into()],
            vec![ClassWeights { label: 0.0, weights: vec![1.0], bias: 0.0 }],
        )
        .is_err());
    }

    #[test]
    fn load_rejects_labels_outside_stress_scale() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(
            &path,
            r#"{"features": ["TEMP"], "classes": [
                {"label": 0.0, "weights": [0.0], "bias": 0.0},
                {"label": 3.0, "weights": [1.0], "bias": -31.0}
            ]}"#,
        )
        .unwrap();

        let err = LinearStressModel::load(&path).unwrap_err();
        assert!(err.to_string().contains("label 3"));

        assert!(LinearStressModel::new(
            vec!["TEMP".into()],
            vec![ClassWeights { label: -1.0, weights: vec![1.0], bias: 0.0 }],
        )
        .is_err());
    }

    #[test]
    fn bundled_artifact_parses_and_validates() {
        let model: LinearStressModel = serde_json::from_str(bundled_artifact()).unwrap();
        model.validate().unwrap();
        assert_eq!(model.feature_names(), &["HR".to_string(), "TEMP".to_string()]);

        let calm = model.predict(&[vec![68.0, 30.0]]).unwrap();
        let strained = model.predict(&[vec![125.0, 35.5]]).unwrap();
        assert_eq!(calm, vec![0.0]);
        assert_eq!(strained, vec![2.0]);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = LinearStressModel::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read model artifact"));
    }
}

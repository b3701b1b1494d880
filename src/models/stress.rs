use serde::{Deserialize, Serialize};

pub const ADAPTIVE_THRESHOLD: f64 = 0.25;
pub const OVERWHELMED_THRESHOLD: f64 = 0.75;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StressLabel {
    Resilient,
    Adaptive,
    Overwhelmed,
}

impl StressLabel {
    /// Bucket an average stress in [0, 1]. Lower bounds are inclusive, so
    /// exactly 0.25 is `Adaptive` and exactly 0.75 is `Overwhelmed`.
    pub fn from_score(score: f64) -> Self {
        if score < ADAPTIVE_THRESHOLD {
            StressLabel::Resilient
        } else if score < OVERWHELMED_THRESHOLD {
            StressLabel::Adaptive
        } else {
            StressLabel::Overwhelmed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StressLabel::Resilient => "Resilient",
            StressLabel::Adaptive => "Adaptive",
            StressLabel::Overwhelmed => "Overwhelmed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub label: StressLabel,
    /// Average stress in [0, 1].
    pub score: f64,
}

impl ClassificationResult {
    pub fn from_score(score: f64) -> Self {
        Self {
            label: StressLabel::from_score(score),
            score,
        }
    }

    pub fn score_percent(&self) -> f64 {
        self.score * 100.0
    }

    /// Percentage with two decimals and a trailing `%`, e.g. `"37.50%"`.
    pub fn average_stress(&self) -> String {
        format!("{:.2}%", self.score_percent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_inclusive_on_lower_bound() {
        assert_eq!(StressLabel::from_score(0.0), StressLabel::Resilient);
        assert_eq!(StressLabel::from_score(0.2499), StressLabel::Resilient);
        assert_eq!(StressLabel::from_score(0.25), StressLabel::Adaptive);
        assert_eq!(StressLabel::from_score(0.7499), StressLabel::Adaptive);
        assert_eq!(StressLabel::from_score(0.75), StressLabel::Overwhelmed);
        assert_eq!(StressLabel::from_score(1.0), StressLabel::Overwhelmed);
    }

    #[test]
    fn formats_percent_with_two_decimals() {
        assert_eq!(ClassificationResult::from_score(0.375).average_stress(), "37.50%");
        assert_eq!(ClassificationResult::from_score(0.0).average_stress(), "0.00%");
        assert_eq!(ClassificationResult::from_score(1.0).average_stress(), "100.00%");
    }
}

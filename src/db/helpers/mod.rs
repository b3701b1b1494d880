use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};

use crate::models::StressLabel;

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

pub fn parse_stress_label(value: &str) -> Result<StressLabel> {
    match value {
        "Resilient" => Ok(StressLabel::Resilient),
        "Adaptive" => Ok(StressLabel::Adaptive),
        "Overwhelmed" => Ok(StressLabel::Overwhelmed),
        other => Err(anyhow!("unknown stress status {other}")),
    }
}

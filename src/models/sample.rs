//! Physiological sample model.
//!
//! Samples keep the wire/storage field names used by the sensor firmware and
//! the stored biometrics rows (`HR`, `TEMP`, `datetime`).

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    #[serde(rename = "HR")]
    pub heart_rate: f64,
    #[serde(rename = "TEMP")]
    pub temperature: f64,
    #[serde(rename = "datetime", with = "sample_datetime")]
    pub captured_at: NaiveDateTime,
}

impl Sample {
    pub fn new(heart_rate: f64, temperature: f64, captured_at: NaiveDateTime) -> Self {
        Self {
            heart_rate,
            temperature,
            captured_at,
        }
    }

    /// Stamp a reading with local wall-clock time, truncated to whole seconds
    /// so the stored form round-trips exactly.
    pub fn now(heart_rate: f64, temperature: f64) -> Self {
        let now = Local::now().naive_local();
        let captured_at = now.with_nanosecond(0).unwrap_or(now);
        Self::new(heart_rate, temperature, captured_at)
    }

    pub fn formatted_datetime(&self) -> String {
        self.captured_at.format(DATETIME_FORMAT).to_string()
    }
}

mod sample_datetime {
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    use super::DATETIME_FORMAT;

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(DATETIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, DATETIME_FORMAT).map_err(serde::de::Error::custom)
    }
}

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::session::SessionConfig;

const SETTINGS_ENV: &str = "BIOGAZE_SETTINGS";
const DEFAULT_SETTINGS_FILE: &str = "biogaze.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub bind_addr: String,
    pub db_path: PathBuf,
    pub model_path: PathBuf,
    pub accept_when_idle: bool,
    pub persist_timeout_ms: u64,
    pub gaze_frame_interval_ms: u64,
    pub gaze_seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".into(),
            db_path: PathBuf::from("data/biogaze.sqlite3"),
            model_path: PathBuf::from("artifacts/model_stress.json"),
            accept_when_idle: true,
            persist_timeout_ms: 5_000,
            gaze_frame_interval_ms: 100,
            gaze_seed: None,
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    if value == "1" || value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value == "0" || value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(anyhow!("{key} must be true/false/1/0, got '{value}'"))
    }
}

fn parse_u64(key: &str, value: &str) -> Result<u64> {
    value
        .parse()
        .with_context(|| format!("{key} must be a non-negative integer, got '{value}'"))
}

impl Settings {
    /// Defaults, then the JSON settings file (if present), then environment
    /// overrides.
    pub fn load() -> Result<Self> {
        let path = std::env::var(SETTINGS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SETTINGS_FILE));

        let mut settings = Self::from_file(&path)?;
        settings.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings in {}", path.display()))
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("BIOGAZE_BIND") {
            self.bind_addr = value;
        }
        if let Some(value) = lookup("BIOGAZE_DB_PATH") {
            self.db_path = PathBuf::from(value);
        }
        if let Some(value) = lookup("BIOGAZE_MODEL_PATH") {
            self.model_path = PathBuf::from(value);
        }
        if let Some(value) = lookup("BIOGAZE_ACCEPT_WHEN_IDLE") {
            self.accept_when_idle = parse_bool("BIOGAZE_ACCEPT_WHEN_IDLE", &value)?;
        }
        if let Some(value) = lookup("BIOGAZE_PERSIST_TIMEOUT_MS") {
            self.persist_timeout_ms = parse_u64("BIOGAZE_PERSIST_TIMEOUT_MS", &value)?;
        }
        if let Some(value) = lookup("BIOGAZE_GAZE_INTERVAL_MS") {
            self.gaze_frame_interval_ms = parse_u64("BIOGAZE_GAZE_INTERVAL_MS", &value)?;
        }
        if let Some(value) = lookup("BIOGAZE_GAZE_SEED") {
            self.gaze_seed = Some(parse_u64("BIOGAZE_GAZE_SEED", &value)?);
        }
        Ok(())
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            accept_when_idle: self.accept_when_idle,
            persist_timeout: Duration::from_millis(self.persist_timeout_ms),
        }
    }

    pub fn gaze_frame_interval(&self) -> Duration {
        Duration::from_millis(self.gaze_frame_interval_ms.max(1))
    }
}

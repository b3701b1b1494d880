use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SampleBuffer;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
    #[default]
    Idle,
    Active,
    ActiveWithGaze,
}

impl SessionStatus {
    pub fn is_active(&self) -> bool {
        !matches!(self, SessionStatus::Idle)
    }
}

/// The single process-wide session slot.
///
/// `candidate_id` and `started_at` are `Some` exactly when `status` is not
/// `Idle`. The buffer outlives sessions: idle ingestion may fill it, and it is
/// cleared on every start and stop.
#[derive(Debug, Default)]
pub struct SessionState {
    pub status: SessionStatus,
    pub candidate_id: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub buffer: SampleBuffer,
}

/// What `end_session` hands back: everything the stop path needs once the
/// lock is released.
#[derive(Debug)]
pub struct ClosedSession {
    pub candidate_id: String,
    pub with_gaze: bool,
    pub samples: Vec<crate::models::Sample>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub candidate_id: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub sample_count: usize,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session, discarding whatever was buffered or active before.
    pub fn begin_session(&mut self, candidate_id: String, with_gaze: bool, start_at: DateTime<Utc>) {
        self.status = if with_gaze {
            SessionStatus::ActiveWithGaze
        } else {
            SessionStatus::Active
        };
        self.candidate_id = Some(candidate_id);
        self.started_at = Some(start_at);
        self.buffer.reset();
    }

    /// Close the active session: take the buffer and return to Idle in one
    /// step. Returns `None` when nothing is active, leaving state untouched.
    pub fn end_session(&mut self) -> Option<ClosedSession> {
        if !self.status.is_active() {
            return None;
        }

        let with_gaze = self.status == SessionStatus::ActiveWithGaze;
        let candidate_id = self.candidate_id.take().unwrap_or_default();
        let samples = self.buffer.take();

        self.status = SessionStatus::Idle;
        self.started_at = None;

        Some(ClosedSession {
            candidate_id,
            with_gaze,
            samples,
        })
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status,
            candidate_id: self.candidate_id.clone(),
            started_at: self.started_at,
            sample_count: self.buffer.len(),
        }
    }
}

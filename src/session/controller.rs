use std::{sync::Arc, time::Duration};

use anyhow::anyhow;
use chrono::Utc;
use log::{debug, error, info, warn};
use tokio::sync::Mutex;

use crate::{
    classifier::{classify, StressModel},
    db::RecordStore,
    error::{ClassifyError, SessionError},
    gaze::GazeTracker,
    models::{assemble, CandidateRecord, ClassificationResult, GazeSummary, Sample},
};

use super::{SessionSnapshot, SessionState, SessionStatus};

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Buffer samples even when no session is active, so the latest reading
    /// can be served to passive readers.
    pub accept_when_idle: bool,
    pub persist_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            accept_when_idle: true,
            persist_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    Buffered,
    /// Idle with `accept_when_idle = false`; the sample was dropped.
    NotLogging,
}

#[derive(Debug)]
pub struct StopOutcome {
    pub candidate_id: String,
    pub sample_count: usize,
    /// Classification failures do not fail the stop; they are reported here
    /// and no record is persisted.
    pub stress: Result<ClassificationResult, ClassifyError>,
    pub gaze: Option<GazeSummary>,
}

/// Owns the single session slot.
///
/// `state` is held only for short read-modify-write steps, so sample
/// ingestion never waits on I/O. `lifecycle` serializes start and stop
/// against each other, including the gaze hooks they call.
#[derive(Clone)]
pub struct SessionController {
    state: Arc<Mutex<SessionState>>,
    lifecycle: Arc<Mutex<()>>,
    model: Arc<dyn StressModel>,
    gaze: Arc<dyn GazeTracker>,
    store: Arc<dyn RecordStore>,
    config: SessionConfig,
}

fn validate_candidate_id(candidate_id: &str) -> Result<String, SessionError> {
    let trimmed = candidate_id.trim();
    if trimmed.is_empty() {
        return Err(SessionError::InvalidArgument("ID is required".into()));
    }
    Ok(trimmed.to_string())
}

impl SessionController {
    pub fn new(
        model: Arc<dyn StressModel>,
        gaze: Arc<dyn GazeTracker>,
        store: Arc<dyn RecordStore>,
        config: SessionConfig,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::new())),
            lifecycle: Arc::new(Mutex::new(())),
            model,
            gaze,
            store,
            config,
        }
    }

    pub async fn status(&self) -> SessionSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Start a stress-only session. An active session is overwritten
    /// (last start wins); if it owned a gaze capture, that capture is dropped.
    pub async fn start_session(&self, candidate_id: &str) -> Result<SessionSnapshot, SessionError> {
        let candidate_id = validate_candidate_id(candidate_id)?;
        let _lifecycle = self.lifecycle.lock().await;

        let (previous, snapshot) = {
            let mut state = self.state.lock().await;
            let previous = state.status;
            if previous.is_active() {
                warn!(
                    "Overwriting active session {:?} with {}; {} buffered samples discarded",
                    state.candidate_id,
                    candidate_id,
                    state.buffer.len()
                );
            }
            state.begin_session(candidate_id.clone(), false, Utc::now());
            (previous, state.snapshot())
        };

        if previous == SessionStatus::ActiveWithGaze {
            match self.gaze.stop().await {
                Ok(summary) => info!(
                    "Discarded gaze capture of overwritten session ({} frames)",
                    summary.gaze_patterns.len()
                ),
                Err(err) => warn!("Failed to stop gaze capture of overwritten session: {err:#}"),
            }
        }

        info!("Logging started for ID {candidate_id}");
        Ok(snapshot)
    }

    /// Start a combined stress + gaze session. The gaze hook runs first; if it
    /// fails, no state changes.
    pub async fn start_session_with_gaze(
        &self,
        candidate_id: &str,
    ) -> Result<SessionSnapshot, SessionError> {
        let candidate_id = validate_candidate_id(candidate_id)?;
        let _lifecycle = self.lifecycle.lock().await;

        self.gaze
            .start(Some(&candidate_id))
            .await
            .map_err(SessionError::Gaze)?;

        let snapshot = {
            let mut state = self.state.lock().await;
            if state.status.is_active() {
                warn!(
                    "Overwriting active session {:?} with {}; {} buffered samples discarded",
                    state.candidate_id,
                    candidate_id,
                    state.buffer.len()
                );
            }
            state.begin_session(candidate_id.clone(), true, Utc::now());
            state.snapshot()
        };

        info!("Logging started for ID {candidate_id} with gaze tracking");
        Ok(snapshot)
    }

    pub async fn ingest_sample(&self, sample: Sample) -> IngestOutcome {
        let mut state = self.state.lock().await;
        if state.status.is_active() || self.config.accept_when_idle {
            state.buffer.append(sample);
            IngestOutcome::Buffered
        } else {
            debug!("Dropping sample received while idle");
            IngestOutcome::NotLogging
        }
    }

    pub async fn latest_sample(&self) -> Result<Sample, SessionError> {
        self.state
            .lock()
            .await
            .buffer
            .latest()
            .cloned()
            .ok_or(SessionError::NoData)
    }

    /// Close the active session, classify its samples and persist the record.
    ///
    /// The state is back to Idle with an empty buffer before classification
    /// or persistence begin, whatever their outcome.
    pub async fn stop_session(&self) -> Result<StopOutcome, SessionError> {
        let lifecycle = self.lifecycle.lock().await;

        let closed = {
            let mut state = self.state.lock().await;
            state.end_session()
        }
        .ok_or(SessionError::NotActive)?;

        let sample_count = closed.samples.len();
        info!(
            "Logging stopped for ID {} ({} samples)",
            closed.candidate_id, sample_count
        );

        let gaze = if closed.with_gaze {
            match self.gaze.stop().await {
                Ok(summary) => Some(summary),
                Err(err) => {
                    warn!(
                        "Gaze stop failed for {}; record will carry no gaze data: {err:#}",
                        closed.candidate_id
                    );
                    None
                }
            }
        } else {
            None
        };
        drop(lifecycle);

        let samples = Arc::new(closed.samples);
        let stress = self.classify(Arc::clone(&samples)).await;

        match &stress {
            Ok(result) => {
                let record = assemble(&closed.candidate_id, result, &samples, gaze.as_ref());
                self.persist(&record).await?;
                info!(
                    "Saved record for {}: {} ({})",
                    record.candidate_id,
                    record.stress_status.as_str(),
                    record.average_stress
                );
            }
            Err(err) => {
                warn!(
                    "Classification failed for {}; no record saved: {err}",
                    closed.candidate_id
                );
            }
        }

        Ok(StopOutcome {
            candidate_id: closed.candidate_id,
            sample_count,
            stress,
            gaze,
        })
    }

    async fn classify(&self, samples: Arc<Vec<Sample>>) -> Result<ClassificationResult, ClassifyError> {
        let model = Arc::clone(&self.model);
        match tokio::task::spawn_blocking(move || classify(model.as_ref(), &samples)).await {
            Ok(result) => result,
            Err(join_err) => Err(ClassifyError::Model(anyhow!(
                "classification task failed: {join_err}"
            ))),
        }
    }

    async fn persist(&self, record: &CandidateRecord) -> Result<(), SessionError> {
        let timeout = self.config.persist_timeout;
        match tokio::time::timeout(timeout, self.store.insert_record(record)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => {
                error!(
                    "Failed to persist record for {}: {err:#}",
                    record.candidate_id
                );
                Err(SessionError::Persistence(err))
            }
            Err(_) => {
                error!(
                    "Persisting record for {} timed out after {} ms",
                    record.candidate_id,
                    timeout.as_millis()
                );
                Err(SessionError::PersistenceTimeout(timeout.as_millis() as u64))
            }
        }
    }
}

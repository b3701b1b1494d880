use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use log::info;
use tokio::{task::JoinHandle, time::Duration};
use tokio_util::sync::CancellationToken;

use super::{loop_worker::frame_loop, FrameGazeTracker, FrameSource};

/// Owns the process-wide gaze frame loop.
pub struct FrameLoop {
    handle: Option<JoinHandle<()>>,
    cancel_token: CancellationToken,
}

impl FrameLoop {
    pub fn spawn(
        source: Box<dyn FrameSource>,
        tracker: FrameGazeTracker,
        interval: Duration,
    ) -> Self {
        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(frame_loop(
            Arc::new(Mutex::new(source)),
            tracker,
            interval,
            cancel_token.clone(),
        ));

        info!("Gaze frame loop started ({} ms interval)", interval.as_millis());

        Self {
            handle: Some(handle),
            cancel_token,
        }
    }

    pub async fn shutdown(mut self) -> Result<()> {
        self.cancel_token.cancel();
        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("gaze frame loop task failed to join")
        } else {
            Ok(())
        }
    }
}

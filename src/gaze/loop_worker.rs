use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use log::{error, info, warn};
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::models::GazePoint;

use super::{FrameGazeTracker, FrameSource};

const FRAME_TIMEOUT_SECS: u64 = 2;

/// Pull frames from `source` on every tick and feed them to the tracker until
/// cancelled. Runs for the life of the process, independent of sessions.
pub async fn frame_loop(
    source: Arc<Mutex<Box<dyn FrameSource>>>,
    tracker: FrameGazeTracker,
    interval: Duration,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let fut = capture_frame(Arc::clone(&source));
                match tokio::time::timeout(Duration::from_secs(FRAME_TIMEOUT_SECS), fut).await {
                    Ok(Ok(Some(point))) => tracker.record_frame(point).await,
                    Ok(Ok(None)) => {}
                    Ok(Err(err)) => error!("gaze frame capture failed: {err:?}"),
                    Err(_) => warn!("gaze frame capture timeout (> {}s)", FRAME_TIMEOUT_SECS),
                }
            }
            _ = cancel_token.cancelled() => {
                info!("gaze frame loop shutting down");
                break;
            }
        }
    }
}

async fn capture_frame(source: Arc<Mutex<Box<dyn FrameSource>>>) -> Result<Option<GazePoint>> {
    tokio::task::spawn_blocking(move || {
        let mut guard = source
            .lock()
            .map_err(|_| anyhow!("frame source lock poisoned"))?;
        guard.next_frame()
    })
    .await
    .context("frame capture worker join failed")?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gaze::{GazeTracker, SyntheticSource};

    struct FailingSource;

    impl FrameSource for FailingSource {
        fn next_frame(&mut self) -> Result<Option<GazePoint>> {
            Err(anyhow!("camera unplugged"))
        }
    }

    #[tokio::test]
    async fn loop_feeds_tracker_until_cancelled() {
        let tracker = FrameGazeTracker::new();
        tracker.start(Some("loop")).await.unwrap();

        let source: Box<dyn FrameSource> = Box::new(SyntheticSource::new(Some(1)));
        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(frame_loop(
            Arc::new(Mutex::new(source)),
            tracker.clone(),
            Duration::from_millis(5),
            cancel_token.clone(),
        ));

        tokio::time::sleep(Duration::from_millis(60)).await;
        cancel_token.cancel();
        handle.await.unwrap();

        let summary = tracker.stop().await.unwrap();
        assert!(!summary.gaze_patterns.is_empty());
    }

    #[tokio::test]
    async fn source_failures_do_not_stop_the_loop() {
        let tracker = FrameGazeTracker::new();
        tracker.start(Some("failing")).await.unwrap();
        let source: Box<dyn FrameSource> = Box::new(FailingSource);
        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(frame_loop(
            Arc::new(Mutex::new(source)),
            tracker.clone(),
            Duration::from_millis(5),
            cancel_token.clone(),
        ));

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(!handle.is_finished());

        cancel_token.cancel();
        handle.await.unwrap();
        assert!(tracker.stop().await.unwrap().gaze_patterns.is_empty());
    }
}

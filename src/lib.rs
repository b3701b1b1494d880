pub mod classifier;
pub mod db;
pub mod error;
pub mod gaze;
pub mod models;
pub mod server;
pub mod session;
pub mod settings;

use std::sync::Arc;

use anyhow::Context;
use classifier::LinearStressModel;
use db::Database;
use gaze::{FrameGazeTracker, FrameLoop, GazeTracker, SyntheticSource};
use session::SessionController;
use settings::Settings;

/// Shared state handed to every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    pub(crate) sessions: SessionController,
    pub(crate) gaze: Arc<dyn GazeTracker>,
}

impl AppState {
    pub fn new(sessions: SessionController, gaze: Arc<dyn GazeTracker>) -> Self {
        Self { sessions, gaze }
    }
}

pub async fn run() -> anyhow::Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    log::info!("biogaze starting up...");

    let settings = Settings::load().context("failed to load settings")?;
    log::info!("Settings: {settings:?}");

    let database = Database::new(settings.db_path.clone())?;
    let model = LinearStressModel::load(&settings.model_path)?;

    // The frame loop runs for the life of the process, not per session.
    let tracker = FrameGazeTracker::new();
    let frame_loop = FrameLoop::spawn(
        Box::new(SyntheticSource::new(settings.gaze_seed)),
        tracker.clone(),
        settings.gaze_frame_interval(),
    );
    let gaze: Arc<dyn GazeTracker> = Arc::new(tracker);

    let sessions = SessionController::new(
        Arc::new(model),
        Arc::clone(&gaze),
        Arc::new(database),
        settings.session_config(),
    );

    let served = server::serve(&settings.bind_addr, AppState::new(sessions, gaze)).await;

    frame_loop.shutdown().await?;
    log::info!("biogaze stopped");
    served
}

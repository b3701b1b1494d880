//! HTTP surface for the session service.
//!
//! Every JSON body carries a `status` field. Error bodies are always
//! `{status: "failure", message}`.

use anyhow::{Context, Result};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::info;
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::{
    error::SessionError,
    gaze::commands::{start_logging_cam, stop_logging_cam},
    session::commands::{
        latest_data, receive_data, session_status, start_all, start_logging, stop_all,
        stop_logging,
    },
    AppState,
};

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        let status = match &err {
            SessionError::InvalidArgument(_) | SessionError::NotActive => StatusCode::BAD_REQUEST,
            SessionError::NoData => StatusCode::NOT_FOUND,
            SessionError::Gaze(_) => StatusCode::BAD_GATEWAY,
            SessionError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SessionError::PersistenceTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        };
        let message = match err {
            SessionError::InvalidArgument(message) => message,
            other => other.to_string(),
        };
        Self::new(status, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "status": "failure",
            "message": self.message,
        }));
        (self.status, body).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/startLogging", post(start_logging))
        .route("/stopLogging", post(stop_logging))
        .route("/data", get(latest_data).post(receive_data))
        .route("/startAll", post(start_all))
        .route("/stopAll", post(stop_all))
        .route("/startLoggingCam", post(start_logging_cam))
        .route("/stopLoggingCam", get(stop_logging_cam))
        .route("/status", get(session_status))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(bind_addr: &str, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

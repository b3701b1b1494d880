use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{error::GazeNotActive, server::ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct CamStartRequest {
    pub name: Option<String>,
}

/// Gaze-only capture, independent of the stress session.
pub async fn start_logging_cam(
    State(state): State<AppState>,
    payload: Result<Json<CamStartRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let name = payload
        .ok()
        .and_then(|Json(body)| body.name)
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("'name' field is required"))?;

    state
        .gaze
        .start(Some(&name))
        .await
        .map_err(|err| ApiError::new(StatusCode::BAD_GATEWAY, format!("{err:#}")))?;

    Ok(Json(json!({
        "status": "success",
        "message": format!("Gaze logging started for {name}"),
    })))
}

pub async fn stop_logging_cam(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let summary = state.gaze.stop().await.map_err(|err| {
        if err.is::<GazeNotActive>() {
            ApiError::new(StatusCode::CONFLICT, err.to_string())
        } else {
            ApiError::new(StatusCode::BAD_GATEWAY, format!("{err:#}"))
        }
    })?;

    Ok(Json(json!({ "message": summary })))
}

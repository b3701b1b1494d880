use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use log::debug;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    classifier::StressReport,
    models::Sample,
    server::ApiError,
    session::{IngestOutcome, SessionSnapshot, StopOutcome},
    AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct StartRequest {
    pub id: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SampleRequest {
    pub bpm: Option<f64>,
    pub temperature: Option<f64>,
}

/// Scalar ids are taken as their text form; anything else counts as missing.
fn candidate_id_from(payload: Result<Json<StartRequest>, JsonRejection>) -> String {
    match payload.ok().and_then(|Json(body)| body.id) {
        Some(Value::String(id)) => id,
        Some(Value::Number(id)) => id.to_string(),
        _ => String::new(),
    }
}

fn stop_response(outcome: &StopOutcome, include_gaze: bool) -> Value {
    let (status, message) = match outcome.stress {
        Ok(_) => ("success", "Logging stopped and data saved"),
        Err(_) => (
            "failure",
            "Logging stopped but stress classification failed; no record was saved",
        ),
    };

    let mut body = json!({
        "status": status,
        "message": message,
        "stress_result": StressReport::from(&outcome.stress),
    });
    if include_gaze {
        body["gaze_result"] = json!(outcome.gaze.as_ref().map(|g| g.focus_index));
    }
    body
}

pub async fn start_logging(
    State(state): State<AppState>,
    payload: Result<Json<StartRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = candidate_id_from(payload);
    let snapshot = state.sessions.start_session(&id).await?;
    let id = snapshot.candidate_id.unwrap_or(id);

    Ok(Json(json!({
        "status": "success",
        "message": format!("Logging started for ID {id}"),
    })))
}

pub async fn stop_logging(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let outcome = state.sessions.stop_session().await?;
    Ok(Json(stop_response(&outcome, false)))
}

pub async fn start_all(
    State(state): State<AppState>,
    payload: Result<Json<StartRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = candidate_id_from(payload);
    state.sessions.start_session_with_gaze(&id).await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Logging started for both stress and gaze.",
    })))
}

pub async fn stop_all(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let outcome = state.sessions.stop_session().await?;
    Ok(Json(stop_response(&outcome, true)))
}

pub async fn receive_data(
    State(state): State<AppState>,
    payload: Result<Json<SampleRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = payload.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    debug!("Received data: {body:?}");

    let (Some(bpm), Some(temperature)) = (body.bpm, body.temperature) else {
        return Err(ApiError::bad_request("Missing bpm or temperature"));
    };

    match state.sessions.ingest_sample(Sample::now(bpm, temperature)).await {
        IngestOutcome::Buffered => Ok(Json(json!({ "status": "success" }))),
        IngestOutcome::NotLogging => Ok(Json(json!({
            "status": "ignored",
            "message": "Logging is not currently active",
        }))),
    }
}

pub async fn latest_data(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let sample = state.sessions.latest_sample().await?;
    Ok(Json(json!({
        "status": "success",
        "bpm": sample.heart_rate,
        "temperature": sample.temperature,
        "datetime": sample.formatted_datetime(),
    })))
}

pub async fn session_status(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.sessions.status().await)
}

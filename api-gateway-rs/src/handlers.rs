// api-gateway-rs/src/handlers.rs
// Route handlers. Each one is a thin shell around an orchestrator call plus
// the response envelope the dashboard expects.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use orchestrator_service_rs::CollaboratorModes;
use shared_types_rs::{
    derive_timeline, summary_text, AudioReference, ErrorReportPayload, Incident, TimelineEntry,
};

use crate::error::ApiError;
use crate::AppState;

pub const SERVICE_NAME: &str = "auto-ops";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub incident_id: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub incidents: Vec<Incident>,
    pub count: usize,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub incident: Incident,
    pub timeline: Vec<TimelineEntry>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CompleteResponse {
    pub incident: Incident,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub success: bool,
    pub message: String,
    pub deleted_count: usize,
    pub timestamp: DateTime<Utc>,
}

/// Returned instead of audio bytes when there is nothing playable.
#[derive(Debug, Serialize)]
pub struct SimulatedAudioResponse {
    pub message: String,
    pub incident_id: String,
    pub audio_url: String,
    pub mock: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub service_name: String,
    pub uptime_seconds: u64,
    pub collaborators: CollaboratorModes,
}

pub async fn report_error(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ErrorReportPayload>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::Rejected(e.status(), e.body_text()))?;

    let id = state
        .orchestrator
        .start_workflow(payload)
        .await
        .map_err(|e| ApiError::from_workflow(e, "Internal server error"))?;

    Ok(Json(SubmitResponse {
        incident_id: id.to_string(),
        message: "Error received and processing started".to_string(),
    }))
}

pub async fn list_incidents(State(state): State<Arc<AppState>>) -> Json<ListResponse> {
    let incidents = state.orchestrator.list_incidents().await;
    Json(ListResponse {
        count: incidents.len(),
        incidents,
        timestamp: Utc::now(),
    })
}

pub async fn get_incident(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DetailResponse>, ApiError> {
    let incident = state
        .orchestrator
        .get_incident(&id)
        .await
        .map_err(|e| ApiError::from_workflow(e, "Failed to fetch incident"))?;

    Ok(Json(DetailResponse {
        timeline: derive_timeline(&incident),
        incident,
        timestamp: Utc::now(),
    }))
}

pub async fn complete_incident(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CompleteResponse>, ApiError> {
    let incident = state
        .orchestrator
        .complete_manually(&id)
        .await
        .map_err(|e| ApiError::from_workflow(e, "Failed to complete incident"))?;

    Ok(Json(CompleteResponse {
        incident,
        message: "Incident manually completed".to_string(),
        timestamp: Utc::now(),
    }))
}

pub async fn incident_audio(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let incident = state
        .orchestrator
        .get_incident(&id)
        .await
        .map_err(|e| ApiError::from_workflow(e, "Failed to retrieve voice summary"))?;

    let Some(reference) = incident.audio_url.clone() else {
        return Err(ApiError::NotFound(
            "Voice summary not available for this incident".to_string(),
        ));
    };

    let response = match AudioReference::classify(&reference) {
        AudioReference::Inline(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "audio/mpeg".to_string()),
                (header::CONTENT_LENGTH, bytes.len().to_string()),
                (header::CACHE_CONTROL, "public, max-age=3600".to_string()),
            ],
            bytes,
        )
            .into_response(),
        AudioReference::Remote(url) => Redirect::temporary(&url).into_response(),
        AudioReference::Simulated => {
            let mock_data_uri = reference.starts_with("data:audio/");
            Json(SimulatedAudioResponse {
                message: format!(
                    "Voice summary for incident {} would play here",
                    incident.id
                ),
                incident_id: incident.id.to_string(),
                audio_url: reference,
                mock: true,
                summary_text: mock_data_uri.then(|| summary_text(&incident)),
            })
            .into_response()
        }
    };
    Ok(response)
}

pub async fn clear_incidents(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ClearResponse>, ApiError> {
    let deleted_count = state
        .orchestrator
        .clear()
        .await
        .map_err(|e| ApiError::from_workflow(e, "Failed to clear incidents"))?;
    info!(deleted_count, "incidents cleared via API");

    Ok(Json(ClearResponse {
        success: true,
        message: format!("Cleared {} incidents from storage", deleted_count),
        deleted_count,
        timestamp: Utc::now(),
    }))
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        healthy: true,
        service_name: SERVICE_NAME.to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        collaborators: state.orchestrator.modes(),
    })
}

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::calculate_standings;
use crate::ingest::{parse_matches_csv, IngestOptions};
use crate::models::Match;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub matches: usize,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        matches: state.matches().await.len(),
    })
}

#[derive(Debug, Serialize)]
pub struct MatchListResponse {
    pub total: usize,
    pub completed: usize,
    pub matches: Vec<Match>,
}

pub async fn list_matches(State(state): State<AppState>) -> Json<MatchListResponse> {
    let matches = state.matches().await;
    Json(MatchListResponse {
        total: matches.len(),
        completed: matches.iter().filter(|m| m.is_completed()).count(),
        matches: (*matches).clone(),
    })
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub imported: usize,
    pub teams: usize,
}

/// Replace the match list with an uploaded CSV document.
pub async fn upload_matches(State(state): State<AppState>, body: String) -> Result<Json<UploadResponse>, ApiError> {
    let matches = parse_matches_csv(body.as_bytes(), &IngestOptions::default())?;
    let response = UploadResponse {
        imported: matches.len(),
        teams: calculate_standings(&matches).len(),
    };

    state.session.write().await.replace_matches(matches);
    Ok(Json(response))
}

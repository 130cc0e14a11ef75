use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{ApiError, PairParams};
use crate::calculate::{build_match_prediction, predict_match_outcome, run_prediction, AdvancedPrediction, OutcomePrediction};
use crate::models::{Match, MatchPrediction, PredictedResult};
use crate::session::{HistorySummary, SavedPrediction};

/// Quick scoreline prediction.
pub async fn predict(
    State(state): State<AppState>,
    Query(params): Query<PairParams>,
) -> Result<Json<OutcomePrediction>, ApiError> {
    let (home, away) = params.validate()?;
    let matches = state.matches().await;
    Ok(Json(predict_match_outcome(home, away, &matches)))
}

pub async fn advanced(
    State(state): State<AppState>,
    Query(params): Query<PairParams>,
) -> Result<Json<AdvancedPrediction>, ApiError> {
    let (home, away) = params.validate()?;
    let matches = state.matches().await;
    Ok(Json(run_prediction(home, away, &matches)))
}

fn prediction_for(state: &AppState, params: &PairParams, matches: &[Match]) -> Result<MatchPrediction, ApiError> {
    let (home, away) = params.validate()?;
    let translator = state.translator(params.lang);
    Ok(build_match_prediction(
        home,
        away,
        matches,
        &translator,
        Utc::now().naive_utc(),
    ))
}

/// Full prediction bundle, labels in the requested language.
pub async fn full_prediction(
    State(state): State<AppState>,
    Query(params): Query<PairParams>,
) -> Result<Json<MatchPrediction>, ApiError> {
    let matches = state.matches().await;
    Ok(Json(prediction_for(&state, &params, &matches)?))
}

#[derive(Debug, Serialize)]
pub struct PredictionListResponse {
    pub predictions: Vec<SavedPrediction>,
    pub summary: HistorySummary,
}

pub async fn list_predictions(State(state): State<AppState>) -> Json<PredictionListResponse> {
    let session = state.session.read().await;
    Json(PredictionListResponse {
        predictions: session.predictions.entries().to_vec(),
        summary: session.predictions.summary(),
    })
}

/// Build a prediction for the pairing and keep it in the history.
pub async fn save_prediction(
    State(state): State<AppState>,
    Json(params): Json<PairParams>,
) -> Result<Json<SavedPrediction>, ApiError> {
    let mut session = state.session.write().await;
    let prediction = prediction_for(&state, &params, &session.matches)?;
    Ok(Json(session.predictions.save(prediction).clone()))
}

#[derive(Debug, Deserialize)]
pub struct ResultRequest {
    pub home: String,
    pub away: String,
    pub result: PredictedResult,
}

pub async fn record_result(
    State(state): State<AppState>,
    Json(req): Json<ResultRequest>,
) -> Result<Json<SavedPrediction>, ApiError> {
    let mut session = state.session.write().await;
    let saved = session
        .predictions
        .record_result(req.home.trim(), req.away.trim(), req.result)?;
    Ok(Json(saved.clone()))
}

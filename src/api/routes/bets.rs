use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::state::AppState;
use crate::api::{ApiError, PairParams};
use crate::calculate::calculate_value_bets;
use crate::models::{MatchId, PatternType, PredictionPattern, ValueBet};
use crate::session::BetMetrics;

#[derive(Debug, Serialize)]
pub struct ValueBetsResponse {
    pub home: String,
    pub away: String,
    pub patterns: Vec<PredictionPattern>,
}

/// Qualitative betting patterns for a pairing.
pub async fn value_bets(
    State(state): State<AppState>,
    Query(params): Query<PairParams>,
) -> Result<Json<ValueBetsResponse>, ApiError> {
    let (home, away) = params.validate()?;
    let matches = state.matches().await;
    Ok(Json(ValueBetsResponse {
        home: home.to_string(),
        away: away.to_string(),
        patterns: calculate_value_bets(home, away, &matches),
    }))
}

#[derive(Debug, Serialize)]
pub struct BetListResponse {
    pub bets: Vec<ValueBet>,
    pub metrics: BetMetrics,
}

pub async fn list_bets(State(state): State<AppState>) -> Json<BetListResponse> {
    let session = state.session.read().await;
    Json(BetListResponse {
        bets: session.bets.bets().to_vec(),
        metrics: session.bets.metrics(),
    })
}

#[derive(Debug, Deserialize)]
pub struct PlaceBetRequest {
    pub match_id: MatchId,
    pub pattern_type: PatternType,
    pub stake: f64,
    pub odds: f64,
}

/// Record a bet on one of the match's current patterns.
pub async fn place_bet(
    State(state): State<AppState>,
    Json(req): Json<PlaceBetRequest>,
) -> Result<Json<ValueBet>, ApiError> {
    let mut session = state.session.write().await;

    let fixture = session
        .find_match(&req.match_id)
        .ok_or_else(|| ApiError::NotFound(format!("match {}", req.match_id)))?;

    let pattern = calculate_value_bets(&fixture.home_team, &fixture.away_team, &session.matches)
        .into_iter()
        .find(|p| p.pattern_type == req.pattern_type)
        .ok_or_else(|| ApiError::BadRequest(format!("no {} pattern for this match", req.pattern_type)))?;

    let bet = session.bets.place_bet(req.match_id, pattern, req.stake, req.odds)?;
    Ok(Json(bet.clone()))
}

#[derive(Debug, Deserialize)]
pub struct SettleRequest {
    pub won: bool,
}

pub async fn settle_bet(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SettleRequest>,
) -> Result<Json<ValueBet>, ApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::BadRequest(format!("invalid bet id: {}", id)))?;
    let mut session = state.session.write().await;
    let bet = session.bets.settle(id, req.won)?;
    Ok(Json(bet.clone()))
}

use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::{ApiError, PairParams};
use crate::calculate::{calculate_league_statistics, calculate_standings, get_head_to_head_stats};
use crate::models::{HeadToHeadStat, LeagueStatistics, StandingsEntry};

#[derive(Debug, Serialize)]
pub struct StandingsResponse {
    pub standings: Vec<StandingsEntry>,
}

pub async fn standings(State(state): State<AppState>) -> Json<StandingsResponse> {
    let matches = state.matches().await;
    Json(StandingsResponse {
        standings: calculate_standings(&matches),
    })
}

pub async fn overview(State(state): State<AppState>) -> Json<LeagueStatistics> {
    let matches = state.matches().await;
    Json(calculate_league_statistics(&matches))
}

pub async fn head_to_head(
    State(state): State<AppState>,
    Query(params): Query<PairParams>,
) -> Result<Json<HeadToHeadStat>, ApiError> {
    let (home, away) = params.validate()?;
    let matches = state.matches().await;
    Ok(Json(get_head_to_head_stats(home, away, &matches)))
}

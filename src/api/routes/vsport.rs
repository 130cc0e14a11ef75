use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::vsport::{calculate_betting_value, find_vsport_betting_patterns, BettingValue};
use crate::models::{PredictionPattern, VSportMatch};
use crate::ticker::time_until;

/// A ticker match with its badge label and countdown.
#[derive(Debug, Serialize)]
pub struct VSportView {
    #[serde(flatten)]
    pub fixture: VSportMatch,
    pub status_label: &'static str,
    pub time_until: String,
}

impl VSportView {
    fn new(fixture: &VSportMatch, now: DateTime<Utc>) -> Self {
        Self {
            fixture: fixture.clone(),
            status_label: fixture.status.label(),
            time_until: time_until(fixture.kickoff, now),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VSportListResponse {
    pub matches: Vec<VSportView>,
}

fn board(matches: &[VSportMatch], now: DateTime<Utc>) -> VSportListResponse {
    VSportListResponse {
        matches: matches.iter().map(|m| VSportView::new(m, now)).collect(),
    }
}

pub async fn list_vsport(State(state): State<AppState>) -> Json<VSportListResponse> {
    let session = state.session.read().await;
    Json(board(session.ticker.matches(), Utc::now()))
}

/// Advance the ticker to the current time.
pub async fn refresh_vsport(State(state): State<AppState>) -> Json<VSportListResponse> {
    let now = Utc::now();
    let mut session = state.session.write().await;
    Json(board(session.ticker.refresh(now), now))
}

#[derive(Debug, Serialize)]
pub struct VSportValueResponse {
    pub fixture: VSportView,
    pub value: BettingValue,
    pub patterns: Vec<PredictionPattern>,
}

/// Value analysis of one ticker match against the loaded match history.
pub async fn vsport_value(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VSportValueResponse>, ApiError> {
    let session = state.session.read().await;
    let fixture = session
        .ticker
        .get(&id)
        .ok_or_else(|| ApiError::NotFound(format!("V-sport match {}", id)))?;

    let matches = &session.matches;
    Ok(Json(VSportValueResponse {
        fixture: VSportView::new(fixture, Utc::now()),
        value: calculate_betting_value(&fixture.odds, &fixture.home_team, &fixture.away_team, matches),
        patterns: find_vsport_betting_patterns(&fixture.odds, &fixture.home_team, &fixture.away_team, matches),
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::routes::test_support::{get_json, post_json, test_app};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_list_board() {
        let (app, _) = test_app();
        let (status, json) = get_json(app, "/api/vsport").await;
        assert_eq!(status, StatusCode::OK);

        let board = json["matches"].as_array().unwrap();
        assert_eq!(board.len(), 4);
        assert_eq!(board[0]["id"], "vs-1");
        assert_eq!(board[0]["status_label"], "Betting Open");
        assert_eq!(board[2]["time_until"], "Started");
        assert_eq!(board[3]["status"], "completed");
    }

    #[tokio::test]
    async fn test_refresh_keeps_board() {
        let (app, _) = test_app();
        let (status, json) = post_json(app, "/api/vsport/refresh", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["matches"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_value_for_ticker_match() {
        let (app, _) = test_app();
        let (status, json) = get_json(app, "/api/vsport/vs-1/value").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["fixture"]["home_team"], "Virtual Arsenal");

        let implied = json["value"]["implied"]["home"].as_f64().unwrap();
        assert!((implied - 1.0 / 2.4).abs() < 1e-9);
        // No history for either side: model splits home and away evenly
        assert_eq!(json["value"]["model"]["draw"], 0.0);
        assert!(!json["value"]["best_bet"].is_null());
    }

    #[tokio::test]
    async fn test_value_unknown_match() {
        let (app, _) = test_app();
        let (status, json) = get_json(app, "/api/vsport/vs-99/value").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }
}

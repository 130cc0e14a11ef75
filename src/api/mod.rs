//! REST API endpoints.
//!
//! Axum-based HTTP API over the statistics layer: standings, predictions,
//! value bets and the simulated V-sport ticker.

pub mod routes;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::i18n::Language;
use crate::ingest::IngestError;
use crate::session::{BetError, HistoryError};

use self::state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::Pattern(e) => ApiError::Internal(e.to_string()),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

impl From<BetError> for ApiError {
    fn from(err: BetError) -> Self {
        match &err {
            BetError::NotFound(_) => ApiError::NotFound(err.to_string()),
            _ => ApiError::BadRequest(err.to_string()),
        }
    }
}

impl From<HistoryError> for ApiError {
    fn from(err: HistoryError) -> Self {
        ApiError::NotFound(err.to_string())
    }
}

/// `?home=&away=` query shared by the fixture endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct PairParams {
    pub home: String,
    pub away: String,
    pub lang: Option<Language>,
}

impl PairParams {
    /// Both teams named and distinct.
    pub fn validate(&self) -> Result<(&str, &str), ApiError> {
        let (home, away) = (self.home.trim(), self.away.trim());
        if home.is_empty() || away.is_empty() {
            return Err(ApiError::BadRequest("home and away teams are required".to_string()));
        }
        if crate::models::team_key(home) == crate::models::team_key(away) {
            return Err(ApiError::BadRequest("home and away teams must differ".to_string()));
        }
        Ok((home, away))
    }
}

fn cors_layer(origin: &str) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origin == "*" {
        return cors.allow_origin(Any);
    }
    match HeaderValue::from_str(origin) {
        Ok(value) => cors.allow_origin(AllowOrigin::exact(value)),
        Err(_) => {
            tracing::warn!(origin, "Invalid CORS origin, allowing any");
            cors.allow_origin(Any)
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState, server: &ServerConfig) -> Router {
    use routes::{bets, i18n, matches, predictions, stats, vsport};

    Router::new()
        .route("/api/health", get(matches::health))
        .route("/api/matches", get(matches::list_matches).post(matches::upload_matches))
        .route("/api/standings", get(stats::standings))
        .route("/api/overview", get(stats::overview))
        .route("/api/head-to-head", get(stats::head_to_head))
        .route("/api/predict", get(predictions::predict))
        .route("/api/prediction", get(predictions::full_prediction))
        .route("/api/advanced", get(predictions::advanced))
        .route(
            "/api/predictions",
            get(predictions::list_predictions).post(predictions::save_prediction),
        )
        .route("/api/predictions/result", post(predictions::record_result))
        .route("/api/value-bets", get(bets::value_bets))
        .route("/api/bets", get(bets::list_bets).post(bets::place_bet))
        .route("/api/bets/:id/settle", post(bets::settle_bet))
        .route("/api/vsport", get(vsport::list_vsport))
        .route("/api/vsport/refresh", post(vsport::refresh_vsport))
        .route("/api/vsport/:id/value", get(vsport::vsport_value))
        .route("/api/i18n", get(i18n::translations))
        .with_state(state)
        .layer(DefaultBodyLimit::max(server.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&server.cors_origin))
}

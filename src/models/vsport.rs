//! Simulated live-match ("V-sport") models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Outcome;

/// Invalid bookmaker odds.
#[derive(Debug, Error, PartialEq)]
pub enum OddsError {
    #[error("{outcome} odds must be a positive number, got {value}")]
    NonPositive { outcome: Outcome, value: f64 },
}

/// Decimal bookmaker odds for the three full-time outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketOdds {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

impl MarketOdds {
    pub fn new(home: f64, draw: f64, away: f64) -> Result<Self, OddsError> {
        for (outcome, value) in [
            (Outcome::Home, home),
            (Outcome::Draw, draw),
            (Outcome::Away, away),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(OddsError::NonPositive { outcome, value });
            }
        }
        Ok(Self { home, draw, away })
    }

    pub fn for_outcome(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Home => self.home,
            Outcome::Draw => self.draw,
            Outcome::Away => self.away,
        }
    }
}

/// Lifecycle of a simulated match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VSportStatus {
    Upcoming,
    BettingOpen,
    InProgress,
    Completed,
}

impl VSportStatus {
    /// Display label for the status badge.
    pub fn label(&self) -> &'static str {
        match self {
            VSportStatus::Upcoming => "Upcoming",
            VSportStatus::BettingOpen => "Betting Open",
            VSportStatus::InProgress => "In Progress",
            VSportStatus::Completed => "Completed",
        }
    }
}

/// A match on the simulated ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VSportMatch {
    pub id: String,
    pub home_team: String,
    pub away_team: String,
    pub kickoff: DateTime<Utc>,
    pub status: VSportStatus,
    pub odds: MarketOdds,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub round: u32,
}

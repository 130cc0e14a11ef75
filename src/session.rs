//! Per-session state: saved predictions and recorded value bets.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{team_key, Match, MatchId, MatchPrediction, PatternType, PredictedResult, PredictionPattern, ValueBet};
use crate::ticker::Ticker;

/// Predictions above this confidence count as high confidence.
pub const HIGH_CONFIDENCE: f64 = 0.7;

#[derive(Debug, Error, PartialEq)]
pub enum BetError {
    #[error("stake must be a positive number, got {0}")]
    InvalidStake(f64),

    #[error("bookmaker odds must be a positive number, got {0}")]
    InvalidOdds(f64),

    #[error("bet not found: {0}")]
    NotFound(Uuid),

    #[error("bet {0} is already settled")]
    AlreadySettled(Uuid),
}

#[derive(Debug, Error, PartialEq)]
pub enum HistoryError {
    #[error("no saved prediction for {home} vs {away}")]
    NotFound { home: String, away: String },
}

/// Running totals over every recorded bet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BetMetrics {
    pub total_stake: f64,
    pub total_return: f64,
    pub won_bets: u32,
    pub total_bets: u32,
    /// Return on investment, percent
    pub roi: f64,
}

/// Recorded value bets, in placement order.
#[derive(Debug, Clone, Default)]
pub struct BetTracker {
    bets: Vec<ValueBet>,
}

impl BetTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bets(&self) -> &[ValueBet] {
        &self.bets
    }

    /// Record a bet on `pattern` at `odds`.
    pub fn place_bet(
        &mut self,
        match_id: MatchId,
        pattern: PredictionPattern,
        stake: f64,
        odds: f64,
    ) -> Result<&ValueBet, BetError> {
        if !(stake.is_finite() && stake > 0.0) {
            return Err(BetError::InvalidStake(stake));
        }
        if !(odds.is_finite() && odds > 0.0) {
            return Err(BetError::InvalidOdds(odds));
        }

        let bet = ValueBet::new(match_id, pattern, stake, odds);
        info!(
            id = %bet.id,
            match_id = %bet.match_id,
            pattern = bet.pattern.pattern_type.as_str(),
            stake,
            odds,
            rating = bet.value_rating,
            "Bet placed"
        );
        self.bets.push(bet);
        Ok(&self.bets[self.bets.len() - 1])
    }

    /// Mark a bet won or lost. Each bet settles once.
    pub fn settle(&mut self, id: Uuid, won: bool) -> Result<&ValueBet, BetError> {
        let bet = self
            .bets
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(BetError::NotFound(id))?;

        if bet.is_settled() {
            warn!(%id, "Bet already settled");
            return Err(BetError::AlreadySettled(id));
        }

        bet.settle(won);
        info!(%id, won, "Bet settled");
        Ok(&*bet)
    }

    pub fn metrics(&self) -> BetMetrics {
        let mut metrics = self.bets.iter().fold(BetMetrics::default(), |mut acc, bet| {
            acc.total_stake += bet.stake;
            acc.total_return += bet.actual_return.unwrap_or(0.0);
            if bet.is_won == Some(true) {
                acc.won_bets += 1;
            }
            acc.total_bets += 1;
            acc
        });

        if metrics.total_stake > 0.0 {
            metrics.roi = (metrics.total_return - metrics.total_stake) / metrics.total_stake * 100.0;
        }
        metrics
    }
}

/// A prediction kept in the session history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPrediction {
    pub id: Uuid,
    pub saved_at: DateTime<Utc>,
    pub prediction: MatchPrediction,
    /// Set once the real result is known
    pub actual_result: Option<PredictedResult>,
    pub is_correct: Option<bool>,
}

impl SavedPrediction {
    fn is_for(&self, home_team: &str, away_team: &str) -> bool {
        let fixture = &self.prediction.fixture;
        team_key(&fixture.home_team) == team_key(home_team) && team_key(&fixture.away_team) == team_key(away_team)
    }
}

/// Usage of one pattern type across saved predictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternPerformance {
    pub pattern_type: PatternType,
    pub count: u32,
    /// Occurrences in predictions that turned out correct
    pub correct: u32,
    pub avg_confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub total: u32,
    pub settled: u32,
    pub correct: u32,
    /// Percent of settled predictions that were correct
    pub success_rate: f64,
    pub high_confidence: u32,
    /// Most used first
    pub patterns: Vec<PatternPerformance>,
}

/// Saved predictions, newest last. One entry per home/away pairing.
#[derive(Debug, Clone, Default)]
pub struct PredictionHistory {
    entries: Vec<SavedPrediction>,
}

impl PredictionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[SavedPrediction] {
        &self.entries
    }

    /// Save a prediction, replacing any earlier one for the same pairing.
    pub fn save(&mut self, prediction: MatchPrediction) -> &SavedPrediction {
        let fixture = &prediction.fixture;
        let (home, away) = (fixture.home_team.clone(), fixture.away_team.clone());
        self.entries.retain(|e| !e.is_for(&home, &away));

        info!(home = %home, away = %away, "Prediction saved");
        self.entries.push(SavedPrediction {
            id: Uuid::new_v4(),
            saved_at: Utc::now(),
            prediction,
            actual_result: None,
            is_correct: None,
        });
        &self.entries[self.entries.len() - 1]
    }

    /// Record the real result for a saved pairing.
    pub fn record_result(
        &mut self,
        home_team: &str,
        away_team: &str,
        actual: PredictedResult,
    ) -> Result<&SavedPrediction, HistoryError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.is_for(home_team, away_team))
            .ok_or_else(|| HistoryError::NotFound {
                home: home_team.to_string(),
                away: away_team.to_string(),
            })?;

        entry.actual_result = Some(actual);
        entry.is_correct = Some(entry.prediction.predicted_result == actual);
        Ok(&*entry)
    }

    pub fn summary(&self) -> HistorySummary {
        let settled: Vec<&SavedPrediction> = self.entries.iter().filter(|e| e.is_correct.is_some()).collect();
        let correct = settled.iter().filter(|e| e.is_correct == Some(true)).count() as u32;

        let mut order: Vec<PatternType> = Vec::new();
        let mut stats: HashMap<PatternType, (u32, u32, f64)> = HashMap::new();
        for entry in &self.entries {
            for pattern in &entry.prediction.patterns {
                let stat = stats.entry(pattern.pattern_type).or_insert_with(|| {
                    order.push(pattern.pattern_type);
                    (0, 0, 0.0)
                });
                stat.0 += 1;
                if entry.is_correct == Some(true) {
                    stat.1 += 1;
                }
                stat.2 += pattern.confidence;
            }
        }

        let mut patterns: Vec<PatternPerformance> = order
            .into_iter()
            .filter_map(|pattern_type| {
                stats.get(&pattern_type).map(|&(count, correct, total)| PatternPerformance {
                    pattern_type,
                    count,
                    correct,
                    avg_confidence: total / f64::from(count),
                })
            })
            .collect();
        // Stable sort keeps first-seen order among equal counts
        patterns.sort_by(|a, b| b.count.cmp(&a.count));

        HistorySummary {
            total: self.entries.len() as u32,
            settled: settled.len() as u32,
            correct,
            success_rate: crate::calculate::percentage(correct, settled.len() as u32),
            high_confidence: self
                .entries
                .iter()
                .filter(|e| e.prediction.confidence_level > HIGH_CONFIDENCE)
                .count() as u32,
            patterns,
        }
    }
}

/// Everything the server keeps between requests.
#[derive(Debug, Clone)]
pub struct Session {
    /// Current match list; replaced wholesale on upload
    pub matches: Arc<Vec<Match>>,
    pub predictions: PredictionHistory,
    pub bets: BetTracker,
    pub ticker: Ticker,
}

impl Session {
    pub fn new(matches: Vec<Match>, ticker: Ticker) -> Self {
        Self {
            matches: Arc::new(matches),
            predictions: PredictionHistory::new(),
            bets: BetTracker::new(),
            ticker,
        }
    }

    /// Swap in a freshly ingested match list.
    pub fn replace_matches(&mut self, matches: Vec<Match>) {
        info!(count = matches.len(), "Match list replaced");
        self.matches = Arc::new(matches);
    }

    pub fn find_match(&self, id: &MatchId) -> Option<&Match> {
        self.matches.iter().find(|m| &m.id == id)
    }
}

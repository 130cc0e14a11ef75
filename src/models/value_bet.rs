//! User-recorded value bets.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MatchId, PredictionPattern};

/// A bet recorded against a match and a chosen pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueBet {
    pub id: Uuid,
    pub match_id: MatchId,
    pub pattern: PredictionPattern,
    pub stake: f64,
    pub bookmaker_odds: f64,

    /// stake × bookmaker odds
    pub potential_return: f64,

    pub expected_value: f64,

    /// 1 to 5
    pub value_rating: u8,

    pub recommended_stake: u32,

    /// `None` until settled
    pub is_won: Option<bool>,
    pub actual_return: Option<f64>,
}

impl ValueBet {
    /// Record a new unsettled bet. Inputs are validated by the tracker.
    pub fn new(match_id: MatchId, pattern: PredictionPattern, stake: f64, bookmaker_odds: f64) -> Self {
        let expected_value = bet_expected_value(&pattern, bookmaker_odds);
        let value_rating = bet_value_rating(expected_value);

        Self {
            id: Uuid::new_v4(),
            match_id,
            pattern,
            stake,
            bookmaker_odds,
            potential_return: stake * bookmaker_odds,
            expected_value,
            value_rating,
            recommended_stake: u32::from(value_rating) * 10,
            is_won: None,
            actual_return: None,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.is_won.is_some()
    }

    /// Record the result. A lost bet returns nothing.
    pub fn settle(&mut self, won: bool) {
        self.is_won = Some(won);
        self.actual_return = Some(if won { self.potential_return } else { 0.0 });
    }
}

/// Expected value per unit stake of backing `pattern` at `odds`.
///
/// The pattern's historical success rate stands in for the probability.
pub fn bet_expected_value(pattern: &PredictionPattern, odds: f64) -> f64 {
    let probability = pattern.historical_success / 100.0;
    probability * (odds - 1.0) - (1.0 - probability)
}

/// 1-5 rating of a recorded bet's expected value.
///
/// This scale differs from [`crate::calculate::vsport::vsport_value_rating`]; the two
/// rate different kinds of bet and are kept apart.
pub fn bet_value_rating(expected_value: f64) -> u8 {
    if expected_value <= 0.0 {
        1
    } else if expected_value < 0.1 {
        2
    } else if expected_value < 0.2 {
        3
    } else if expected_value < 0.4 {
        4
    } else {
        5
    }
}

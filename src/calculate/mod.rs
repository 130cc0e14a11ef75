//! Statistics calculation engine.
//!
//! Computes derived metrics from an in-memory match list:
//! - League standings and competition-wide aggregates
//! - Heuristic scoreline and winner predictions
//! - Half-time/full-time pattern frequencies
//! - Value-bet patterns and expected-value ratings
//!
//! Every function here is pure: it takes a match slice and returns a fresh
//! result. Insufficient data never fails; each calculation defines its own
//! zero or default result instead.

pub mod engine;
pub mod overview;
pub mod predictor;
pub mod standings;
pub mod value_bets;
pub mod vsport;

pub use engine::{build_match_prediction, run_prediction, AdvancedPrediction};
pub use overview::calculate_league_statistics;
pub use predictor::{get_head_to_head_stats, predict_match_outcome, OutcomePrediction};
pub use standings::calculate_standings;
pub use value_bets::calculate_value_bets;
pub use vsport::calculate_betting_value;

use crate::models::Match;

/// Percentage (0 to 100) of `count` over `total`; 0 when `total` is 0.
///
/// Whole percentages come out exact (3 of 20 is 15.0, not 15.000000000000002).
pub fn percentage(count: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        f64::from(count) * 100.0 / f64::from(total)
    }
}

/// Round to `decimals` decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Matches in which `team` played, on either side.
pub fn team_matches<'a>(team: &str, matches: &'a [Match]) -> Vec<&'a Match> {
    matches.iter().filter(|m| m.involves(team)).collect()
}

/// Meetings between `a` and `b`, at either venue.
pub fn head_to_head_matches<'a>(a: &str, b: &str, matches: &'a [Match]) -> Vec<&'a Match> {
    matches.iter().filter(|m| m.is_between(a, b)).collect()
}

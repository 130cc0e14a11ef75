//! Expected-value calculator for the simulated V-sport market.

use serde::{Deserialize, Serialize};

use crate::models::{FormResult, MarketOdds, Match, Outcome, PatternType, PredictionPattern};

use super::engine::OutcomeProbabilities;
use super::{head_to_head_matches, team_matches};

/// Multiplier on the home side's win rate and goal average.
pub const VSPORT_HOME_ADVANTAGE: f64 = 1.3;

/// Multiplier on the away side's win rate.
pub const VSPORT_AWAY_FACTOR: f64 = 0.8;

/// Minimum expected goals per side for the BTTS pattern.
const BTTS_EXPECTED_GOALS: f64 = 0.8;

/// Model probabilities and expected goals for a pairing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeamOutlook {
    /// Unnormalised outcome weights
    pub probabilities: OutcomeProbabilities,
    pub home_expected_goals: f64,
    pub away_expected_goals: f64,
}

/// Result of comparing model probabilities with bookmaker odds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BettingValue {
    /// Outcome with the highest positive expected value
    pub best_bet: Option<Outcome>,
    /// Model probability of the best bet, 0 when there is none
    pub confidence: f64,
    /// Highest expected value per unit stake, reported even when negative
    pub expected_value: f64,
    pub value_rating: u8,
    /// Probabilities implied by the odds (1 / odds)
    pub implied: OutcomeProbabilities,
    /// Normalised model probabilities
    pub model: OutcomeProbabilities,
}

impl BettingValue {
    fn none() -> Self {
        let zero = OutcomeProbabilities {
            home: 0.0,
            draw: 0.0,
            away: 0.0,
        };
        Self {
            best_bet: None,
            confidence: 0.0,
            expected_value: 0.0,
            value_rating: 0,
            implied: zero,
            model: zero,
        }
    }
}

fn ratio(count: usize, total: usize) -> f64 {
    count as f64 / total.max(1) as f64
}

/// Outcome weights and expected goals for `home_team` hosting `away_team`.
///
/// Head-to-head meetings, when there are any, decide everything. Otherwise
/// the home side's home record is blended with the away side's away record.
pub fn team_outlook(home_team: &str, away_team: &str, matches: &[Match]) -> TeamOutlook {
    let meetings: Vec<&Match> = head_to_head_matches(home_team, away_team, matches)
        .into_iter()
        .filter(|m| m.is_completed())
        .collect();

    if !meetings.is_empty() {
        let n = meetings.len();
        let mut wins = 0;
        let mut draws = 0;
        let (mut home_goals, mut away_goals) = (0u32, 0u32);
        for m in &meetings {
            let (scored, conceded) = m.goals_for_team(home_team);
            home_goals += scored;
            away_goals += conceded;
            match FormResult::from_goals(scored, conceded) {
                FormResult::W => wins += 1,
                FormResult::D => draws += 1,
                FormResult::L => {}
            }
        }

        return TeamOutlook {
            probabilities: OutcomeProbabilities {
                home: ratio(wins, n),
                draw: ratio(draws, n),
                away: ratio(n - wins - draws, n),
            },
            home_expected_goals: home_goals as f64 / n as f64,
            away_expected_goals: away_goals as f64 / n as f64,
        };
    }

    let completed = |team: &str| -> Vec<&Match> {
        team_matches(team, matches)
            .into_iter()
            .filter(|m| m.is_completed())
            .collect()
    };
    let home_history = completed(home_team);
    let away_history = completed(away_team);

    let home_at_home: Vec<&&Match> = home_history.iter().filter(|m| m.is_home(home_team)).collect();
    let away_on_road: Vec<&&Match> = away_history.iter().filter(|m| m.is_away(away_team)).collect();

    let home_win_rate = ratio(
        home_at_home.iter().filter(|m| m.outcome() == Outcome::Home).count(),
        home_at_home.len(),
    );
    let away_win_rate = ratio(
        away_on_road.iter().filter(|m| m.outcome() == Outcome::Away).count(),
        away_on_road.len(),
    );
    let draw_rate = |history: &[&Match]| {
        ratio(
            history.iter().filter(|m| m.outcome() == Outcome::Draw).count(),
            history.len(),
        )
    };

    let home_goal_average = home_at_home.iter().map(|m| m.home_goals()).sum::<u32>() as f64
        / home_at_home.len().max(1) as f64;
    let away_goal_average = away_on_road.iter().map(|m| m.away_goals()).sum::<u32>() as f64
        / away_on_road.len().max(1) as f64;

    TeamOutlook {
        probabilities: OutcomeProbabilities {
            home: (home_win_rate * VSPORT_HOME_ADVANTAGE + (1.0 - away_win_rate)) / 2.0,
            draw: (draw_rate(&home_history) + draw_rate(&away_history)) / 2.0,
            away: ((1.0 - home_win_rate) + away_win_rate * VSPORT_AWAY_FACTOR) / 2.0,
        },
        home_expected_goals: home_goal_average * VSPORT_HOME_ADVANTAGE,
        away_expected_goals: away_goal_average,
    }
}

/// Compare the model with bookmaker `odds` and pick the best-value outcome.
///
/// An empty match list yields no bet and zero values.
pub fn calculate_betting_value(odds: &MarketOdds, home_team: &str, away_team: &str, matches: &[Match]) -> BettingValue {
    if matches.is_empty() {
        return BettingValue::none();
    }

    let raw = team_outlook(home_team, away_team, matches).probabilities;
    let total = raw.home + raw.draw + raw.away;
    let model = if total > 0.0 {
        OutcomeProbabilities {
            home: raw.home / total,
            draw: raw.draw / total,
            away: raw.away / total,
        }
    } else {
        raw
    };

    let implied = OutcomeProbabilities {
        home: 1.0 / odds.home,
        draw: 1.0 / odds.draw,
        away: 1.0 / odds.away,
    };

    let (best, expected_value) = [Outcome::Home, Outcome::Draw, Outcome::Away]
        .into_iter()
        .map(|outcome| (outcome, odds.for_outcome(outcome) * model.get(outcome) - 1.0))
        .fold((Outcome::Home, f64::NEG_INFINITY), |best, current| {
            if current.1 > best.1 {
                current
            } else {
                best
            }
        });

    let best_bet = (expected_value > 0.0).then_some(best);

    BettingValue {
        best_bet,
        confidence: best_bet.map(|o| model.get(o)).unwrap_or(0.0),
        expected_value,
        value_rating: vsport_value_rating(expected_value),
        implied,
        model,
    }
}

/// 0-5 rating of a V-sport expected value.
pub fn vsport_value_rating(expected_value: f64) -> u8 {
    if expected_value <= 0.0 {
        0
    } else if expected_value < 0.1 {
        1
    } else if expected_value < 0.2 {
        2
    } else if expected_value < 0.3 {
        3
    } else if expected_value < 0.4 {
        4
    } else {
        5
    }
}

/// Betting patterns for a V-sport fixture.
///
/// A positive-value outcome is reported as a draw pattern (draw) or a
/// specific-score pattern (home or away). A both-teams-to-score pattern is
/// added when both sides are expected to score.
pub fn find_vsport_betting_patterns(
    odds: &MarketOdds,
    home_team: &str,
    away_team: &str,
    matches: &[Match],
) -> Vec<PredictionPattern> {
    let mut patterns = Vec::new();

    let value = calculate_betting_value(odds, home_team, away_team, matches);
    if let Some(best) = value.best_bet {
        patterns.push(PredictionPattern {
            pattern_type: if best == Outcome::Draw {
                PatternType::Draw
            } else {
                PatternType::SpecificScore
            },
            confidence: value.confidence,
            description: format!(
                "Value bet detected on {} outcome with expected value {:.2}%",
                best,
                value.expected_value * 100.0
            ),
            historical_success: (value.confidence * 100.0).round(),
            odds_value: odds.for_outcome(best),
        });
    }

    let outlook = team_outlook(home_team, away_team, matches);
    let btts_probability = if outlook.home_expected_goals > BTTS_EXPECTED_GOALS
        && outlook.away_expected_goals > BTTS_EXPECTED_GOALS
    {
        0.75
    } else {
        0.45
    };

    if btts_probability > 0.6 {
        patterns.push(PredictionPattern {
            pattern_type: PatternType::BothTeamsScore,
            confidence: btts_probability,
            description: format!(
                "Both teams have a good scoring record, {:.0}% probability of both scoring",
                btts_probability * 100.0
            ),
            historical_success: (btts_probability * 100.0).round(),
            odds_value: PatternType::BothTeamsScore.odds_value(),
        });
    }

    patterns
}

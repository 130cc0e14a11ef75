//! Advanced prediction engine.
//!
//! Combines per-team expected goals, the league-wide both-teams-to-score
//! rate and a head-to-head winner vote into a single prediction bundle,
//! and assembles the full [`MatchPrediction`] returned to clients.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::i18n::Translator;
use crate::models::{
    FormResult, HalfTimeFullTime, HtFtKind, Match, MatchPrediction, Outcome, PatternType, PredictedResult,
    PredictedScore, PredictionPattern,
};

use super::predictor::get_head_to_head_stats;
use super::{head_to_head_matches, percentage, round_to, team_matches};

/// BTTS pattern is emitted above this league-wide percentage.
pub const BTTS_PATTERN_THRESHOLD: f64 = 50.0;

/// Default number of matches in the form index.
pub const FORM_INDEX_GAMES: usize = 5;

/// Winner of the head-to-head vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictedWinner {
    Home,
    Away,
    Draw,
    Unknown,
}

impl PredictedWinner {
    fn as_outcome(&self) -> Option<Outcome> {
        match self {
            PredictedWinner::Home => Some(Outcome::Home),
            PredictedWinner::Away => Some(Outcome::Away),
            PredictedWinner::Draw => Some(Outcome::Draw),
            PredictedWinner::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WinnerPrediction {
    pub winner: PredictedWinner,
    /// Share of meetings that ended with the predicted outcome (0 to 1)
    pub confidence: f64,
}

/// Probability distribution over the three full-time outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeProbabilities {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

impl OutcomeProbabilities {
    pub fn get(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Home => self.home,
            Outcome::Draw => self.draw,
            Outcome::Away => self.away,
        }
    }
}

/// League-wide goal averages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AverageGoals {
    pub average_total_goals: f64,
    pub average_home_goals: f64,
    pub average_away_goals: f64,
}

/// Venue outcome counts and percentages over a set of matches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeBreakdown {
    pub home_wins: u32,
    pub away_wins: u32,
    pub draws: u32,
    pub home_win_percentage: f64,
    pub away_win_percentage: f64,
    pub draw_percentage: f64,
}

/// Outputs of the individual sub-models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPredictions {
    /// `home_win`, `away_win`, `draw_win` or `insufficient_data`
    pub outcome_label: String,
    pub scoreline: PredictedScore,
    pub probabilities: OutcomeProbabilities,
}

/// Bundle returned by [`run_prediction`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedPrediction {
    pub home_expected_goals: f64,
    pub away_expected_goals: f64,
    pub both_teams_to_score_prob: f64,
    pub predicted_winner: PredictedWinner,
    pub confidence: f64,
    pub model_predictions: ModelPredictions,
    pub patterns: Vec<PredictionPattern>,
}

fn completed(matches: &[Match]) -> Vec<&Match> {
    matches.iter().filter(|m| m.is_completed()).collect()
}

/// Average goals per completed match, overall and per side (2 dp).
pub fn calculate_average_goals(matches: &[Match]) -> AverageGoals {
    let played = completed(matches);
    if played.is_empty() {
        return AverageGoals {
            average_total_goals: 0.0,
            average_home_goals: 0.0,
            average_away_goals: 0.0,
        };
    }

    let n = played.len() as f64;
    let home: u32 = played.iter().map(|m| m.home_goals()).sum();
    let away: u32 = played.iter().map(|m| m.away_goals()).sum();

    AverageGoals {
        average_total_goals: round_to((home + away) as f64 / n, 2),
        average_home_goals: round_to(home as f64 / n, 2),
        average_away_goals: round_to(away as f64 / n, 2),
    }
}

/// Points share (0 to 100, 2 dp) over a team's most recent `recent_games`.
///
/// The match list is in chronological order, so the most recent games
/// are at the end.
pub fn calculate_form_index(team: &str, matches: &[Match], recent_games: usize) -> f64 {
    if team.trim().is_empty() {
        return 0.0;
    }

    let played: Vec<&Match> = team_matches(team, matches)
        .into_iter()
        .filter(|m| m.is_completed())
        .collect();
    let recent = &played[played.len().saturating_sub(recent_games)..];
    if recent.is_empty() {
        return 0.0;
    }

    let points: u32 = recent
        .iter()
        .map(|m| {
            let (scored, conceded) = m.goals_for_team(team);
            FormResult::from_goals(scored, conceded).points()
        })
        .sum();

    round_to(points as f64 / (recent.len() * 3) as f64 * 100.0, 2)
}

/// Venue outcome breakdown for a set of matches.
pub fn calculate_head_to_head_percentages(matches: &[&Match]) -> OutcomeBreakdown {
    let total = matches.len() as u32;
    let count = |outcome: Outcome| matches.iter().filter(|m| m.outcome() == outcome).count() as u32;
    let (home_wins, away_wins, draws) = (count(Outcome::Home), count(Outcome::Away), count(Outcome::Draw));

    OutcomeBreakdown {
        home_wins,
        away_wins,
        draws,
        home_win_percentage: round_to(percentage(home_wins, total), 2),
        away_win_percentage: round_to(percentage(away_wins, total), 2),
        draw_percentage: round_to(percentage(draws, total), 2),
    }
}

/// A team's scoring average across its completed matches (2 dp).
pub fn calculate_expected_goals(team: &str, matches: &[Match]) -> f64 {
    if team.trim().is_empty() {
        return 0.0;
    }

    let played: Vec<&Match> = team_matches(team, matches)
        .into_iter()
        .filter(|m| m.is_completed())
        .collect();
    if played.is_empty() {
        return 0.0;
    }

    let goals: u32 = played.iter().map(|m| m.goals_for_team(team).0).sum();
    round_to(goals as f64 / played.len() as f64, 2)
}

/// League-wide percentage (2 dp) of completed matches where both sides scored.
pub fn calculate_both_teams_to_score_prob(matches: &[Match]) -> f64 {
    let played = completed(matches);
    let both = played.iter().filter(|m| m.both_teams_scored()).count() as u32;
    round_to(percentage(both, played.len() as u32), 2)
}

/// Most frequent venue outcome among the two teams' meetings.
///
/// A strict majority is needed for a home or away call; anything else
/// falls through to a draw.
pub fn predict_winner(home_team: &str, away_team: &str, matches: &[Match]) -> WinnerPrediction {
    let unknown = WinnerPrediction {
        winner: PredictedWinner::Unknown,
        confidence: 0.0,
    };
    if home_team.trim().is_empty() || away_team.trim().is_empty() {
        return unknown;
    }

    let meetings: Vec<&Match> = head_to_head_matches(home_team, away_team, matches)
        .into_iter()
        .filter(|m| m.is_completed())
        .collect();
    if meetings.is_empty() {
        return unknown;
    }

    let stats = calculate_head_to_head_percentages(&meetings);
    let total = meetings.len() as f64;

    let (winner, count) = if stats.home_wins > stats.away_wins && stats.home_wins > stats.draws {
        (PredictedWinner::Home, stats.home_wins)
    } else if stats.away_wins > stats.home_wins && stats.away_wins > stats.draws {
        (PredictedWinner::Away, stats.away_wins)
    } else {
        (PredictedWinner::Draw, stats.draws)
    };

    WinnerPrediction {
        winner,
        confidence: round_to(count as f64 / total, 2),
    }
}

/// Probability of `outcome` given a winner vote (2 dp).
///
/// The predicted outcome takes the vote's confidence and the other two
/// split the rest evenly. Without a vote every outcome gets a third.
pub fn calculate_win_probability(prediction: &WinnerPrediction, outcome: Outcome) -> f64 {
    match prediction.winner.as_outcome() {
        None => round_to(1.0 / 3.0, 2),
        Some(predicted) if predicted == outcome => prediction.confidence,
        Some(_) => round_to((1.0 - prediction.confidence) / 2.0, 2),
    }
}

/// Run the advanced prediction for a fixture.
pub fn run_prediction(home_team: &str, away_team: &str, matches: &[Match]) -> AdvancedPrediction {
    let home_expected_goals = calculate_expected_goals(home_team, matches);
    let away_expected_goals = calculate_expected_goals(away_team, matches);
    let both_teams_to_score_prob = calculate_both_teams_to_score_prob(matches);
    let winner = predict_winner(home_team, away_team, matches);

    let mut patterns = Vec::new();

    if both_teams_to_score_prob > BTTS_PATTERN_THRESHOLD {
        patterns.push(PredictionPattern {
            pattern_type: PatternType::BothTeamsScore,
            confidence: both_teams_to_score_prob / 100.0,
            description: format!(
                "Based on historical data, both teams have a {}% probability of scoring",
                both_teams_to_score_prob
            ),
            historical_success: both_teams_to_score_prob,
            odds_value: PatternType::BothTeamsScore.odds_value(),
        });
    }

    if winner.winner == PredictedWinner::Draw {
        let success = (winner.confidence * 100.0).round();
        patterns.push(PredictionPattern {
            pattern_type: PatternType::Draw,
            confidence: winner.confidence,
            description: format!("Historical data shows {}% probability of a draw", success),
            historical_success: success,
            odds_value: PatternType::Draw.odds_value(),
        });
    }

    let outcome_label = match winner.winner {
        PredictedWinner::Unknown => "insufficient_data".to_string(),
        PredictedWinner::Home => "home_win".to_string(),
        PredictedWinner::Away => "away_win".to_string(),
        PredictedWinner::Draw => "draw_win".to_string(),
    };

    AdvancedPrediction {
        home_expected_goals,
        away_expected_goals,
        both_teams_to_score_prob,
        predicted_winner: winner.winner,
        confidence: winner.confidence,
        model_predictions: ModelPredictions {
            outcome_label,
            scoreline: PredictedScore {
                home: home_expected_goals.round() as u32,
                away: away_expected_goals.round() as u32,
            },
            probabilities: OutcomeProbabilities {
                home: calculate_win_probability(&winner, Outcome::Home),
                draw: calculate_win_probability(&winner, Outcome::Draw),
                away: calculate_win_probability(&winner, Outcome::Away),
            },
        },
        patterns,
    }
}

/// Half-time/full-time frequencies across the two teams' meetings.
///
/// Only combinations that actually occurred are returned. Reversals come
/// first (highest odds first), then the rest by frequency.
pub fn analyze_half_time_full_time(
    home_team: &str,
    away_team: &str,
    matches: &[Match],
    translator: &Translator,
) -> Vec<HalfTimeFullTime> {
    let meetings: Vec<&Match> = head_to_head_matches(home_team, away_team, matches)
        .into_iter()
        .filter(|m| m.has_half_time())
        .collect();
    if meetings.is_empty() {
        return Vec::new();
    }

    let total = meetings.len() as u32;
    let mut entries: Vec<HalfTimeFullTime> = HtFtKind::ALL
        .iter()
        .filter_map(|kind| {
            let count = meetings
                .iter()
                .filter(|m| HtFtKind::from_outcomes(m.half_time_outcome(), m.outcome()) == *kind)
                .count() as u32;
            if count == 0 {
                return None;
            }
            let frequency = count as f64 / total as f64;
            Some(HalfTimeFullTime {
                kind: *kind,
                label: translator.t(&kind.label_key()).to_string(),
                is_reversal: kind.is_reversal(),
                odds: round_to(1.0 / frequency, 2),
                confidence: round_to(frequency, 2),
            })
        })
        .collect();

    entries.sort_by(|a, b| match (a.is_reversal, b.is_reversal) {
        (true, false) => std::cmp::Ordering::Less,
        (false, true) => std::cmp::Ordering::Greater,
        (true, true) => b.odds.total_cmp(&a.odds),
        (false, false) => b.confidence.total_cmp(&a.confidence),
    });

    entries
}

/// Assemble the full prediction for a fixture kicking off at `kickoff`.
pub fn build_match_prediction(
    home_team: &str,
    away_team: &str,
    matches: &[Match],
    translator: &Translator,
    kickoff: NaiveDateTime,
) -> MatchPrediction {
    let advanced = run_prediction(home_team, away_team, matches);

    let predicted_result = match advanced.predicted_winner {
        PredictedWinner::Home => PredictedResult::HomeWin,
        PredictedWinner::Away => PredictedResult::AwayWin,
        PredictedWinner::Draw | PredictedWinner::Unknown => PredictedResult::Draw,
    };

    let date = kickoff.format("%Y-%m-%d %H:%M").to_string();
    let fixture = Match::new(date, home_team.trim(), away_team.trim()).with_kickoff(kickoff);

    MatchPrediction {
        fixture,
        predicted_result,
        confidence_level: advanced.confidence,
        predicted_score: Some(advanced.model_predictions.scoreline),
        patterns: advanced.patterns,
        htft_analysis: analyze_half_time_full_time(home_team, away_team, matches, translator),
        head_to_head: get_head_to_head_stats(home_team, away_team, matches),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::fixtures::{played, small_league};
    use crate::i18n::Language;

    fn a_beats_b_three_times() -> Vec<Match> {
        vec![
            played("A", "B", (2, 0), (1, 0)),
            played("A", "B", (3, 1), (0, 1)),
            played("A", "B", (1, 0), (0, 0)),
        ]
    }

    #[test]
    fn test_predict_winner_home_sweep() {
        let prediction = predict_winner("A", "B", &a_beats_b_three_times());
        assert_eq!(prediction.winner, PredictedWinner::Home);
        assert_eq!(prediction.confidence, 1.0);
    }

    #[test]
    fn test_predict_winner_tie_falls_through_to_draw() {
        let matches = vec![
            played("A", "B", (2, 0), (1, 0)),
            played("A", "B", (0, 1), (0, 0)),
        ];
        let prediction = predict_winner("a", "b", &matches);
        assert_eq!(prediction.winner, PredictedWinner::Draw);
        assert_eq!(prediction.confidence, 0.0);
    }

    #[test]
    fn test_predict_winner_without_meetings() {
        let prediction = predict_winner("A", "Z", &small_league());
        assert_eq!(prediction.winner, PredictedWinner::Unknown);
        assert_eq!(prediction.confidence, 0.0);
    }

    #[test]
    fn test_win_probability_distribution() {
        let unknown = WinnerPrediction {
            winner: PredictedWinner::Unknown,
            confidence: 0.0,
        };
        assert_eq!(calculate_win_probability(&unknown, Outcome::Home), 0.33);
        assert_eq!(calculate_win_probability(&unknown, Outcome::Draw), 0.33);

        let home = WinnerPrediction {
            winner: PredictedWinner::Home,
            confidence: 0.6,
        };
        assert_eq!(calculate_win_probability(&home, Outcome::Home), 0.6);
        assert_eq!(calculate_win_probability(&home, Outcome::Draw), 0.2);
        assert_eq!(calculate_win_probability(&home, Outcome::Away), 0.2);
    }

    #[test]
    fn test_expected_goals_case_insensitive() {
        let matches = small_league();
        assert_eq!(calculate_expected_goals("arsenal", &matches), 2.0);
        assert_eq!(calculate_expected_goals("LIVERPOOL", &matches), 1.0);
        assert_eq!(calculate_expected_goals("Nobody", &matches), 0.0);
        assert_eq!(calculate_expected_goals("", &matches), 0.0);
    }

    #[test]
    fn test_both_teams_to_score_prob() {
        // 2-1, 1-1, 1-2 out of six
        assert_eq!(calculate_both_teams_to_score_prob(&small_league()), 50.0);
        assert_eq!(calculate_both_teams_to_score_prob(&[]), 0.0);
    }

    #[test]
    fn test_average_goals() {
        let avg = calculate_average_goals(&small_league());
        assert_eq!(avg.average_total_goals, 2.5);
        assert_eq!(avg.average_home_goals, 1.33);
        assert_eq!(avg.average_away_goals, 1.17);
    }

    #[test]
    fn test_form_index_uses_most_recent_games() {
        let matches = small_league();
        // Arsenal: W, W, L -> 6 of 9
        assert_eq!(calculate_form_index("Arsenal", &matches, FORM_INDEX_GAMES), 66.67);
        // Last game only: a loss
        assert_eq!(calculate_form_index("Arsenal", &matches, 1), 0.0);
        assert_eq!(calculate_form_index("Nobody", &matches, 5), 0.0);
    }

    #[test]
    fn test_run_prediction_bundle() {
        let result = run_prediction("A", "B", &a_beats_b_three_times());
        assert_eq!(result.home_expected_goals, 2.0);
        assert_eq!(result.away_expected_goals, 0.33);
        assert_eq!(result.predicted_winner, PredictedWinner::Home);
        assert_eq!(result.model_predictions.outcome_label, "home_win");
        assert_eq!(result.model_predictions.scoreline, PredictedScore { home: 2, away: 0 });
        assert_eq!(result.model_predictions.probabilities.home, 1.0);
        assert_eq!(result.model_predictions.probabilities.away, 0.0);
        // BTTS 33.33% and no draw vote: no patterns
        assert!(result.patterns.is_empty());
    }

    #[test]
    fn test_run_prediction_draw_and_btts_patterns() {
        let matches = vec![
            played("A", "B", (1, 1), (0, 0)),
            played("B", "A", (2, 2), (1, 0)),
            played("A", "B", (2, 1), (1, 1)),
        ];
        let result = run_prediction("A", "B", &matches);
        assert_eq!(result.predicted_winner, PredictedWinner::Draw);
        assert_eq!(result.confidence, 0.67);

        let types: Vec<PatternType> = result.patterns.iter().map(|p| p.pattern_type).collect();
        assert_eq!(types, vec![PatternType::BothTeamsScore, PatternType::Draw]);
        assert_eq!(result.patterns[0].historical_success, 100.0);
        assert_eq!(result.patterns[1].historical_success, 67.0);
    }

    #[test]
    fn test_run_prediction_insufficient_data() {
        let result = run_prediction("A", "B", &[]);
        assert_eq!(result.model_predictions.outcome_label, "insufficient_data");
        assert_eq!(result.model_predictions.probabilities.draw, 0.33);
    }

    #[test]
    fn test_htft_analysis_orders_reversals_first() {
        let translator = Translator::new(Language::En);
        let matches = vec![
            played("A", "B", (2, 1), (0, 1)), // away -> home, reversal
            played("A", "B", (2, 0), (1, 0)), // home -> home
            played("B", "A", (1, 0), (1, 0)), // home -> home
            played("A", "B", (0, 0), (0, 0)), // draw -> draw
        ];
        let analysis = analyze_half_time_full_time("A", "B", &matches, &translator);

        assert_eq!(analysis.len(), 3);
        assert_eq!(analysis[0].kind, HtFtKind::AwayHome);
        assert!(analysis[0].is_reversal);
        assert_eq!(analysis[0].odds, 4.0);
        assert_eq!(analysis[1].kind, HtFtKind::HomeHome);
        assert_eq!(analysis[1].confidence, 0.5);
        assert_eq!(analysis[1].label, "Home - Home");
        assert_eq!(analysis[2].kind, HtFtKind::DrawDraw);
    }

    #[test]
    fn test_build_match_prediction() {
        let translator = Translator::new(Language::En);
        let kickoff = chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(15, 0, 0)
            .unwrap();
        let prediction = build_match_prediction("A", "B", &a_beats_b_three_times(), &translator, kickoff);

        assert_eq!(prediction.predicted_result, PredictedResult::HomeWin);
        assert_eq!(prediction.confidence_level, 1.0);
        assert_eq!(prediction.fixture.date, "2024-05-01 15:00");
        assert_eq!(prediction.head_to_head.total_matches, 3);
        assert_eq!(prediction.head_to_head.htft_reversals, 1);
        assert!(!prediction.htft_analysis.is_empty());
    }

    #[test]
    fn test_build_match_prediction_unknown_maps_to_draw() {
        let translator = Translator::new(Language::Hu);
        let kickoff = chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(15, 0, 0)
            .unwrap();
        let prediction = build_match_prediction("X", "Y", &small_league(), &translator, kickoff);
        assert_eq!(prediction.predicted_result, PredictedResult::Draw);
        assert!(prediction.htft_analysis.is_empty());
        assert_eq!(prediction.head_to_head.total_matches, 0);
    }
}

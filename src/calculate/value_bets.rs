//! Value-bet pattern finder and bet-record expected value.

use serde::{Deserialize, Serialize};

use crate::models::{Match, PatternType, PredictionPattern};

use super::percentage;

/// Frequencies (0 to 100) of the tracked patterns in a match sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternFrequencies {
    pub sample_size: u32,
    pub both_teams_scored_rate: f64,
    pub draw_rate: f64,
    pub htft_reversal_rate: f64,
    pub one_nil_home_win_rate: f64,
    pub two_one_home_win_rate: f64,
    pub one_all_draw_rate: f64,
    pub scoreless_draw_rate: f64,
}

fn rate(matches: &[&Match], pred: impl Fn(&Match) -> bool) -> f64 {
    let hits = matches.iter().copied().filter(|m| pred(*m)).count() as u32;
    percentage(hits, matches.len() as u32)
}

/// Count the tracked patterns across `matches`.
pub fn calculate_pattern_frequencies(matches: &[&Match]) -> PatternFrequencies {
    let score_is = |home: u32, away: u32| move |m: &Match| m.home_goals() == home && m.away_goals() == away;

    PatternFrequencies {
        sample_size: matches.len() as u32,
        both_teams_scored_rate: rate(matches, |m| m.both_teams_scored()),
        draw_rate: rate(matches, |m| m.home_goals() == m.away_goals()),
        htft_reversal_rate: rate(matches, |m| m.is_htft_reversal()),
        one_nil_home_win_rate: rate(matches, score_is(1, 0)),
        two_one_home_win_rate: rate(matches, score_is(2, 1)),
        one_all_draw_rate: rate(matches, score_is(1, 1)),
        scoreless_draw_rate: rate(matches, score_is(0, 0)),
    }
}

/// Pattern confidence: `high` when `rate` exceeds `threshold`, else `low`.
fn bucket(rate: f64, threshold: f64, high: f64, low: f64) -> f64 {
    if rate > threshold {
        high
    } else {
        low
    }
}

/// Frequency-based betting patterns for a fixture.
///
/// The sample is every match with full-time and half-time scores. With no
/// usable sample the four [`default_betting_patterns`] are returned.
/// The team pair is accepted for API symmetry; rates are league-wide.
pub fn calculate_value_bets(_home_team: &str, _away_team: &str, matches: &[Match]) -> Vec<PredictionPattern> {
    let sample: Vec<&Match> = matches.iter().filter(|m| m.has_half_time()).collect();
    if sample.is_empty() {
        return default_betting_patterns();
    }

    let freq = calculate_pattern_frequencies(&sample);

    // Descriptions quote the same whole percentage as `historical_success`
    let btts = freq.both_teams_scored_rate.round();
    let draws = freq.draw_rate.round();
    let reversals = freq.htft_reversal_rate.round();
    let one_all = freq.one_all_draw_rate.round();

    vec![
        PredictionPattern {
            pattern_type: PatternType::BothTeamsScore,
            confidence: bucket(freq.both_teams_scored_rate, 60.0, 0.7, 0.5),
            description: format!("Both teams have scored in {}% of matches", btts),
            historical_success: btts,
            odds_value: PatternType::BothTeamsScore.odds_value(),
        },
        PredictionPattern {
            pattern_type: PatternType::Draw,
            confidence: bucket(freq.draw_rate, 30.0, 0.6, 0.4),
            description: format!("Matches ended in a draw {}% of the time", draws),
            historical_success: draws,
            odds_value: PatternType::Draw.odds_value(),
        },
        PredictionPattern {
            pattern_type: PatternType::HtFtReversal,
            confidence: bucket(freq.htft_reversal_rate, 20.0, 0.5, 0.3),
            description: format!(
                "Result at halftime was different from full time in {}% of matches",
                reversals
            ),
            historical_success: reversals,
            odds_value: PatternType::HtFtReversal.odds_value(),
        },
        PredictionPattern {
            pattern_type: PatternType::SpecificScore,
            confidence: bucket(freq.one_all_draw_rate, 15.0, 0.4, 0.2),
            description: format!("Score of 1-1 occurred in {}% of matches", one_all),
            historical_success: one_all,
            odds_value: PatternType::SpecificScore.odds_value(),
        },
    ]
}

/// Patterns reported when there is no match data to learn from.
pub fn default_betting_patterns() -> Vec<PredictionPattern> {
    let pattern = |pattern_type: PatternType, confidence: f64, description: &str, success: f64| PredictionPattern {
        pattern_type,
        confidence,
        description: description.to_string(),
        historical_success: success,
        odds_value: pattern_type.odds_value(),
    };

    vec![
        pattern(
            PatternType::BothTeamsScore,
            0.5,
            "Based on league averages, both teams have a moderate chance of scoring",
            55.0,
        ),
        pattern(PatternType::Draw, 0.3, "Average draw rate in this league", 25.0),
        pattern(
            PatternType::HtFtReversal,
            0.2,
            "Result reversals between halftime and fulltime occur occasionally",
            15.0,
        ),
        pattern(PatternType::SpecificScore, 0.15, "Common scorelines include 1-1", 10.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::fixtures::{played, small_league};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_matches_return_defaults() {
        let patterns = calculate_value_bets("A", "B", &[]);
        assert_eq!(patterns.len(), 4);

        let odds: Vec<f64> = patterns.iter().map(|p| p.odds_value).collect();
        assert_eq!(odds, vec![1.8, 3.4, 4.5, 6.5]);

        let success: Vec<f64> = patterns.iter().map(|p| p.historical_success).collect();
        assert_eq!(success, vec![55.0, 25.0, 15.0, 10.0]);

        let confidence: Vec<f64> = patterns.iter().map(|p| p.confidence).collect();
        assert_eq!(confidence, vec![0.5, 0.3, 0.2, 0.15]);
    }

    #[test]
    fn test_scheduled_only_returns_defaults() {
        let matches = vec![Match::new("2024-01-01", "A", "B")];
        assert_eq!(calculate_value_bets("A", "B", &matches), default_betting_patterns());
    }

    #[test]
    fn test_small_league_patterns() {
        let patterns = calculate_value_bets("Arsenal", "Chelsea", &small_league());

        // BTTS 3/6 = 50% -> low bucket
        assert_eq!(patterns[0].pattern_type, PatternType::BothTeamsScore);
        assert_eq!(patterns[0].historical_success, 50.0);
        assert_eq!(patterns[0].confidence, 0.5);
        assert_eq!(patterns[0].description, "Both teams have scored in 50% of matches");

        // Draws 2/6 = 33% -> high bucket
        assert_eq!(patterns[1].historical_success, 33.0);
        assert_eq!(patterns[1].confidence, 0.6);

        // Reversals: Arsenal 2-1 Chelsea after trailing 0-1 -> 1/6 = 17%
        assert_eq!(patterns[2].historical_success, 17.0);
        assert_eq!(patterns[2].confidence, 0.3);

        // 1-1: Chelsea v Liverpool -> 1/6 = 17% > 15
        assert_eq!(patterns[3].historical_success, 17.0);
        assert_eq!(patterns[3].confidence, 0.4);
        assert_eq!(patterns[3].odds_value, 6.5);
    }

    #[test]
    fn test_pattern_frequencies_scorelines() {
        let matches = vec![
            played("A", "B", (1, 0), (0, 0)),
            played("A", "B", (2, 1), (1, 1)),
            played("A", "B", (0, 0), (0, 0)),
            played("A", "B", (1, 1), (1, 0)),
        ];
        let refs: Vec<&Match> = matches.iter().collect();
        let freq = calculate_pattern_frequencies(&refs);

        assert_eq!(freq.sample_size, 4);
        assert_eq!(freq.one_nil_home_win_rate, 25.0);
        assert_eq!(freq.two_one_home_win_rate, 25.0);
        assert_eq!(freq.scoreless_draw_rate, 25.0);
        assert_eq!(freq.one_all_draw_rate, 25.0);
        assert_eq!(freq.draw_rate, 50.0);
        assert_eq!(freq.htft_reversal_rate, 0.0);
    }

    /// `hits` copies of `hit` followed by enough `miss` rows to make `total`.
    fn sample(hits: usize, total: usize, hit: ((u32, u32), (u32, u32)), miss: ((u32, u32), (u32, u32))) -> Vec<Match> {
        (0..total)
            .map(|i| {
                let (ft, ht) = if i < hits { hit } else { miss };
                played("A", "B", ft, ht)
            })
            .collect()
    }

    const HOME_ONE_NIL: ((u32, u32), (u32, u32)) = ((1, 0), (1, 0));

    fn confidence_of(matches: &[Match], pattern_type: PatternType) -> f64 {
        calculate_value_bets("A", "B", matches)
            .into_iter()
            .find(|p| p.pattern_type == pattern_type)
            .map(|p| p.confidence)
            .unwrap()
    }

    #[test]
    fn test_descriptions_quote_historical_success() {
        // One 1-1 draw in eight: 12.5% everywhere except reversals
        let matches = sample(1, 8, ((1, 1), (1, 1)), HOME_ONE_NIL);
        let patterns = calculate_value_bets("A", "B", &matches);

        assert_eq!(patterns[0].historical_success, 13.0);
        assert_eq!(patterns[0].description, "Both teams have scored in 13% of matches");
        assert_eq!(patterns[1].historical_success, 13.0);
        assert_eq!(patterns[1].description, "Matches ended in a draw 13% of the time");
        assert_eq!(patterns[3].historical_success, 13.0);
        assert_eq!(patterns[3].description, "Score of 1-1 occurred in 13% of matches");
    }

    #[test]
    fn test_both_teams_score_threshold_is_exclusive() {
        let btts = ((2, 1), (1, 0));
        assert_eq!(confidence_of(&sample(3, 5, btts, HOME_ONE_NIL), PatternType::BothTeamsScore), 0.5);
        assert_eq!(confidence_of(&sample(2, 3, btts, HOME_ONE_NIL), PatternType::BothTeamsScore), 0.7);
    }

    #[test]
    fn test_draw_threshold_is_exclusive() {
        let draw = ((0, 0), (0, 0));
        assert_eq!(confidence_of(&sample(3, 10, draw, HOME_ONE_NIL), PatternType::Draw), 0.4);
        assert_eq!(confidence_of(&sample(4, 13, draw, HOME_ONE_NIL), PatternType::Draw), 0.6);
    }

    #[test]
    fn test_reversal_threshold_is_exclusive() {
        let comeback = ((2, 1), (0, 1));
        assert_eq!(confidence_of(&sample(1, 5, comeback, HOME_ONE_NIL), PatternType::HtFtReversal), 0.3);
        assert_eq!(confidence_of(&sample(2, 9, comeback, HOME_ONE_NIL), PatternType::HtFtReversal), 0.5);
    }

    #[test]
    fn test_one_all_threshold_is_exclusive() {
        let one_all = ((1, 1), (0, 0));
        assert_eq!(confidence_of(&sample(3, 20, one_all, HOME_ONE_NIL), PatternType::SpecificScore), 0.2);
        assert_eq!(confidence_of(&sample(2, 13, one_all, HOME_ONE_NIL), PatternType::SpecificScore), 0.4);
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(bucket(60.0, 60.0, 0.7, 0.5), 0.5);
        assert_eq!(bucket(60.001, 60.0, 0.7, 0.5), 0.7);
        assert_eq!(bucket(15.0, 15.0, 0.4, 0.2), 0.2);
    }
}

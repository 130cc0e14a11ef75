//! Basic scoreline predictor and head-to-head summary.

use serde::{Deserialize, Serialize};

use crate::models::{FormResult, HeadToHeadStat, Match};

use super::{head_to_head_matches, round_to, team_matches};

/// Multiplier applied to the home side's scoring average.
pub const HOME_ADVANTAGE: f64 = 1.2;

/// Confidence boost when the two teams have met before.
pub const HEAD_TO_HEAD_FACTOR: f64 = 1.2;

/// Upper bound on the reported confidence.
pub const MAX_CONFIDENCE: u32 = 90;

/// Reported when the calculation produces no usable value.
pub const FALLBACK_HOME_SCORE: u32 = 1;
pub const FALLBACK_AWAY_SCORE: u32 = 0;
pub const FALLBACK_CONFIDENCE: u32 = 30;

/// Predicted scoreline with a 0-90 confidence percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomePrediction {
    pub home_score: u32,
    pub away_score: u32,
    pub confidence: u32,
}

/// Average goals scored and conceded by a team across its completed matches.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoringAverages {
    pub scored: f64,
    pub conceded: f64,
}

/// Scoring averages for `team`, read from its actual side in each match.
pub fn team_averages(team: &str, matches: &[&Match]) -> ScoringAverages {
    let completed: Vec<&&Match> = matches.iter().filter(|m| m.is_completed()).collect();
    if completed.is_empty() {
        return ScoringAverages::default();
    }

    let (scored, conceded) = completed.iter().fold((0u32, 0u32), |(s, c), m| {
        let (gf, ga) = m.goals_for_team(team);
        (s + gf, c + ga)
    });

    let n = completed.len() as f64;
    ScoringAverages {
        scored: scored as f64 / n,
        conceded: conceded as f64 / n,
    }
}

/// Predict a scoreline from each side's scoring averages.
///
/// Teams with no history get the fallback prediction 1-0 at 30%.
pub fn predict_match_outcome(home_team: &str, away_team: &str, matches: &[Match]) -> OutcomePrediction {
    let home_matches = team_matches(home_team, matches);
    let away_matches = team_matches(away_team, matches);
    let h2h_count = head_to_head_matches(home_team, away_team, matches).len();

    let home = team_averages(home_team, &home_matches);
    let away = team_averages(away_team, &away_matches);

    let home_score = ((home.scored * HOME_ADVANTAGE + away.conceded) / 2.0).round() as u32;
    let away_score = ((away.scored + home.conceded) / 2.0).round() as u32;

    let total = (home_matches.len() + away_matches.len()) as f64;
    let h2h_factor = if h2h_count > 0 { HEAD_TO_HEAD_FACTOR } else { 1.0 };
    let confidence = ((total / 10.0 * h2h_factor * 100.0).round() as u32).min(MAX_CONFIDENCE);

    OutcomePrediction {
        home_score: if home_score == 0 { FALLBACK_HOME_SCORE } else { home_score },
        away_score: if away_score == 0 { FALLBACK_AWAY_SCORE } else { away_score },
        confidence: if confidence == 0 { FALLBACK_CONFIDENCE } else { confidence },
    }
}

/// Summarise the meetings between two teams.
///
/// Wins and goals are counted for the requested `home_team`, whichever
/// side it actually played on.
pub fn get_head_to_head_stats(home_team: &str, away_team: &str, matches: &[Match]) -> HeadToHeadStat {
    let meetings: Vec<&Match> = head_to_head_matches(home_team, away_team, matches)
        .into_iter()
        .filter(|m| m.is_completed())
        .collect();

    let mut stat = HeadToHeadStat::empty(home_team, away_team);
    if meetings.is_empty() {
        return stat;
    }

    for m in &meetings {
        let (scored, conceded) = m.goals_for_team(home_team);
        stat.home_goals += scored;
        stat.away_goals += conceded;

        match FormResult::from_goals(scored, conceded) {
            FormResult::W => stat.home_wins += 1,
            FormResult::D => stat.draws += 1,
            FormResult::L => stat.away_wins += 1,
        }

        if m.both_teams_scored() {
            stat.both_teams_scored += 1;
        }
        if m.has_half_time() && m.is_htft_reversal() {
            stat.htft_reversals += 1;
        }
    }

    stat.total_matches = meetings.len() as u32;
    stat.avg_total_goals = round_to(
        (stat.home_goals + stat.away_goals) as f64 / meetings.len() as f64,
        2,
    );
    stat
}

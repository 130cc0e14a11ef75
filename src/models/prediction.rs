//! Prediction output models.

use serde::{Deserialize, Serialize};

use super::{Match, Outcome};

/// Qualitative betting signal kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    BothTeamsScore,
    Draw,
    HtFtReversal,
    SpecificScore,
}

impl PatternType {
    /// Fixed payout multiplier offered for this pattern.
    pub fn odds_value(&self) -> f64 {
        match self {
            PatternType::BothTeamsScore => 1.8,
            PatternType::Draw => 3.4,
            PatternType::HtFtReversal => 4.5,
            PatternType::SpecificScore => 6.5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PatternType::BothTeamsScore => "both_teams_score",
            PatternType::Draw => "draw",
            PatternType::HtFtReversal => "ht_ft_reversal",
            PatternType::SpecificScore => "specific_score",
        }
    }
}

impl std::fmt::Display for PatternType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One qualitative betting signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionPattern {
    #[serde(rename = "type")]
    pub pattern_type: PatternType,

    /// 0.0 to 1.0
    pub confidence: f64,

    pub description: String,

    /// Percentage (0 to 100) of the sample matching the pattern
    pub historical_success: f64,

    /// Payout multiplier
    pub odds_value: f64,
}

/// The nine half-time/full-time combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HtFtKind {
    HomeHome,
    HomeDraw,
    HomeAway,
    DrawHome,
    DrawDraw,
    DrawAway,
    AwayHome,
    AwayDraw,
    AwayAway,
}

impl HtFtKind {
    pub const ALL: [HtFtKind; 9] = [
        HtFtKind::HomeHome,
        HtFtKind::HomeDraw,
        HtFtKind::HomeAway,
        HtFtKind::DrawHome,
        HtFtKind::DrawDraw,
        HtFtKind::DrawAway,
        HtFtKind::AwayHome,
        HtFtKind::AwayDraw,
        HtFtKind::AwayAway,
    ];

    pub fn from_outcomes(half_time: Outcome, full_time: Outcome) -> Self {
        match (half_time, full_time) {
            (Outcome::Home, Outcome::Home) => HtFtKind::HomeHome,
            (Outcome::Home, Outcome::Draw) => HtFtKind::HomeDraw,
            (Outcome::Home, Outcome::Away) => HtFtKind::HomeAway,
            (Outcome::Draw, Outcome::Home) => HtFtKind::DrawHome,
            (Outcome::Draw, Outcome::Draw) => HtFtKind::DrawDraw,
            (Outcome::Draw, Outcome::Away) => HtFtKind::DrawAway,
            (Outcome::Away, Outcome::Home) => HtFtKind::AwayHome,
            (Outcome::Away, Outcome::Draw) => HtFtKind::AwayDraw,
            (Outcome::Away, Outcome::Away) => HtFtKind::AwayAway,
        }
    }

    /// Half-time leader lost at full time.
    pub fn is_reversal(&self) -> bool {
        matches!(self, HtFtKind::HomeAway | HtFtKind::AwayHome)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HtFtKind::HomeHome => "home_home",
            HtFtKind::HomeDraw => "home_draw",
            HtFtKind::HomeAway => "home_away",
            HtFtKind::DrawHome => "draw_home",
            HtFtKind::DrawDraw => "draw_draw",
            HtFtKind::DrawAway => "draw_away",
            HtFtKind::AwayHome => "away_home",
            HtFtKind::AwayDraw => "away_draw",
            HtFtKind::AwayAway => "away_away",
        }
    }

    /// Translation key for the label of this combination.
    pub fn label_key(&self) -> String {
        format!("htft.{}", self.as_str())
    }
}

/// Observed frequency of one half-time/full-time combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HalfTimeFullTime {
    #[serde(rename = "type")]
    pub kind: HtFtKind,
    pub label: String,
    pub is_reversal: bool,

    /// Fair odds implied by the observed frequency
    pub odds: f64,

    /// Observed frequency, 0.0 to 1.0
    pub confidence: f64,
}

/// Mutual history of two teams, from the requested home team's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadToHeadStat {
    pub home_team: String,
    pub away_team: String,
    pub total_matches: u32,
    pub home_wins: u32,
    pub draws: u32,
    pub away_wins: u32,
    pub home_goals: u32,
    pub away_goals: u32,
    pub both_teams_scored: u32,
    pub avg_total_goals: f64,
    pub htft_reversals: u32,
}

impl HeadToHeadStat {
    /// An empty record for two teams that never met.
    pub fn empty(home_team: &str, away_team: &str) -> Self {
        Self {
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            total_matches: 0,
            home_wins: 0,
            draws: 0,
            away_wins: 0,
            home_goals: 0,
            away_goals: 0,
            both_teams_scored: 0,
            avg_total_goals: 0.0,
            htft_reversals: 0,
        }
    }
}

/// Predicted result category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictedResult {
    HomeWin,
    Draw,
    AwayWin,
}

impl From<Outcome> for PredictedResult {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Home => PredictedResult::HomeWin,
            Outcome::Draw => PredictedResult::Draw,
            Outcome::Away => PredictedResult::AwayWin,
        }
    }
}

/// A predicted scoreline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictedScore {
    pub home: u32,
    pub away: u32,
}

/// Bundled output of one prediction run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPrediction {
    #[serde(rename = "match")]
    pub fixture: Match,
    pub predicted_result: PredictedResult,
    pub confidence_level: f64,
    pub predicted_score: Option<PredictedScore>,
    pub patterns: Vec<PredictionPattern>,
    pub htft_analysis: Vec<HalfTimeFullTime>,
    pub head_to_head: HeadToHeadStat,
}

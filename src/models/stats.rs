//! Derived statistics models.

use serde::{Deserialize, Serialize};

/// Placeholder shown when a team-level highlight has no data.
pub const NO_TEAM: &str = "-";

/// A single result in a team's form guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormResult {
    W,
    D,
    L,
}

impl FormResult {
    /// Result for a team that scored `goals_for` and conceded `goals_against`.
    pub fn from_goals(goals_for: u32, goals_against: u32) -> Self {
        if goals_for > goals_against {
            FormResult::W
        } else if goals_for < goals_against {
            FormResult::L
        } else {
            FormResult::D
        }
    }

    /// League points awarded for this result.
    pub fn points(&self) -> u32 {
        match self {
            FormResult::W => 3,
            FormResult::D => 1,
            FormResult::L => 0,
        }
    }
}

impl std::fmt::Display for FormResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormResult::W => write!(f, "W"),
            FormResult::D => write!(f, "D"),
            FormResult::L => write!(f, "L"),
        }
    }
}

/// Win/draw/loss record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WinDrawLossRecord {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
}

impl WinDrawLossRecord {
    pub fn record(&mut self, result: FormResult) {
        match result {
            FormResult::W => self.wins += 1,
            FormResult::D => self.draws += 1,
            FormResult::L => self.losses += 1,
        }
    }

    /// Total games played.
    pub fn total_games(&self) -> u32 {
        self.wins + self.draws + self.losses
    }

    pub fn points(&self) -> u32 {
        self.wins * 3 + self.draws
    }
}

/// One team's row in the league table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsEntry {
    /// Rank in the table (1 = top)
    pub position: u32,

    /// Team name as first seen in the match list
    pub team: String,

    /// Completed matches played
    pub played: u32,

    pub won: u32,
    pub drawn: u32,
    pub lost: u32,

    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i64,

    pub points: u32,

    /// Most recent results, oldest first
    pub form: Vec<FormResult>,
}

/// Competition-wide aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueStatistics {
    pub total_matches: u32,
    pub completed_matches: u32,
    pub total_goals: u32,
    pub average_goals_per_match: f64,
    pub home_wins: u32,
    pub away_wins: u32,
    pub draws: u32,
    pub most_goals_scored_in_match: u32,

    /// Matches where at least one side kept a clean sheet
    pub clean_sheets: u32,

    /// Team with the most goals scored
    pub top_scorer: String,

    /// Team with the fewest goals conceded
    pub most_clean_sheets: String,
}

impl LeagueStatistics {
    /// The result reported for an empty match list.
    pub fn empty() -> Self {
        Self {
            total_matches: 0,
            completed_matches: 0,
            total_goals: 0,
            average_goals_per_match: 0.0,
            home_wins: 0,
            away_wins: 0,
            draws: 0,
            most_goals_scored_in_match: 0,
            clean_sheets: 0,
            top_scorer: NO_TEAM.to_string(),
            most_clean_sheets: NO_TEAM.to_string(),
        }
    }
}

impl Default for LeagueStatistics {
    fn default() -> Self {
        Self::empty()
    }
}

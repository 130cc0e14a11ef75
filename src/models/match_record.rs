//! Match record model.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::MatchId;

/// Round label used when a fixture carries no round information.
pub const UNKNOWN_ROUND: &str = "Unknown";

/// Normalise a team name for comparison.
///
/// All team lookups in the statistics layer are case-insensitive and
/// ignore surrounding whitespace.
pub fn team_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Full-time (or half-time) result of a match from the venue's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Home,
    Draw,
    Away,
}

impl Outcome {
    /// Outcome of a scoreline.
    pub fn from_scores(home: u32, away: u32) -> Self {
        if home > away {
            Outcome::Home
        } else if home < away {
            Outcome::Away
        } else {
            Outcome::Draw
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Home => "home",
            Outcome::Draw => "draw",
            Outcome::Away => "away",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One played or scheduled fixture.
///
/// Scores are optional: `None` means the fixture has not been played.
/// Aggregates read them through [`Match::home_goals`] and friends, which
/// treat a missing score as 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Deterministic identifier (home + away + date)
    pub id: MatchId,

    /// Date string as normalised at ingestion
    pub date: String,

    /// Parsed kickoff, when the date string could be parsed
    #[serde(default)]
    pub kickoff: Option<NaiveDateTime>,

    pub home_team: String,
    pub away_team: String,

    #[serde(default)]
    pub home_score: Option<u32>,
    #[serde(default)]
    pub away_score: Option<u32>,

    /// Half-time scores
    #[serde(default)]
    pub ht_home_score: Option<u32>,
    #[serde(default)]
    pub ht_away_score: Option<u32>,

    /// Round label (e.g. "Round 3")
    #[serde(default = "default_round")]
    pub round: String,

    #[serde(default)]
    pub venue: Option<String>,
}

fn default_round() -> String {
    UNKNOWN_ROUND.to_string()
}

impl Match {
    /// Create a scheduled fixture with no scores.
    pub fn new(date: impl Into<String>, home_team: impl Into<String>, away_team: impl Into<String>) -> Self {
        let date = date.into();
        let home_team = home_team.into();
        let away_team = away_team.into();
        let id = MatchId::for_fixture(&home_team, &away_team, &date);

        Self {
            id,
            date,
            kickoff: None,
            home_team,
            away_team,
            home_score: None,
            away_score: None,
            ht_home_score: None,
            ht_away_score: None,
            round: default_round(),
            venue: None,
        }
    }

    /// Builder method to set the full-time score.
    pub fn with_score(mut self, home: u32, away: u32) -> Self {
        self.home_score = Some(home);
        self.away_score = Some(away);
        self
    }

    /// Builder method to set the half-time score.
    pub fn with_half_time(mut self, home: u32, away: u32) -> Self {
        self.ht_home_score = Some(home);
        self.ht_away_score = Some(away);
        self
    }

    /// Builder method to set the round label.
    pub fn with_round(mut self, round: impl Into<String>) -> Self {
        self.round = round.into();
        self
    }

    /// Builder method to set the venue.
    pub fn with_venue(mut self, venue: impl Into<String>) -> Self {
        self.venue = Some(venue.into());
        self
    }

    /// Builder method to set the parsed kickoff.
    pub fn with_kickoff(mut self, kickoff: NaiveDateTime) -> Self {
        self.kickoff = Some(kickoff);
        self
    }

    pub fn home_goals(&self) -> u32 {
        self.home_score.unwrap_or(0)
    }

    pub fn away_goals(&self) -> u32 {
        self.away_score.unwrap_or(0)
    }

    pub fn ht_home_goals(&self) -> u32 {
        self.ht_home_score.unwrap_or(0)
    }

    pub fn ht_away_goals(&self) -> u32 {
        self.ht_away_score.unwrap_or(0)
    }

    pub fn total_goals(&self) -> u32 {
        self.home_goals() + self.away_goals()
    }

    /// True when both full-time scores are present.
    pub fn is_completed(&self) -> bool {
        self.home_score.is_some() && self.away_score.is_some()
    }

    /// True when both full-time and both half-time scores are present.
    pub fn has_half_time(&self) -> bool {
        self.is_completed() && self.ht_home_score.is_some() && self.ht_away_score.is_some()
    }

    /// Full-time outcome from the venue's perspective.
    pub fn outcome(&self) -> Outcome {
        Outcome::from_scores(self.home_goals(), self.away_goals())
    }

    /// Half-time outcome from the venue's perspective.
    pub fn half_time_outcome(&self) -> Outcome {
        Outcome::from_scores(self.ht_home_goals(), self.ht_away_goals())
    }

    pub fn both_teams_scored(&self) -> bool {
        self.home_goals() > 0 && self.away_goals() > 0
    }

    /// The half-time leader lost at full time.
    ///
    /// A level score at either stage has no leader and is never a reversal.
    pub fn is_htft_reversal(&self) -> bool {
        matches!(
            (self.half_time_outcome(), self.outcome()),
            (Outcome::Home, Outcome::Away) | (Outcome::Away, Outcome::Home)
        )
    }

    /// Whether `team` played in this match, on either side.
    pub fn involves(&self, team: &str) -> bool {
        self.is_home(team) || self.is_away(team)
    }

    pub fn is_home(&self, team: &str) -> bool {
        team_key(&self.home_team) == team_key(team)
    }

    pub fn is_away(&self, team: &str) -> bool {
        team_key(&self.away_team) == team_key(team)
    }

    /// Whether this match is a meeting between `a` and `b`, at either venue.
    pub fn is_between(&self, a: &str, b: &str) -> bool {
        (self.is_home(a) && self.is_away(b)) || (self.is_home(b) && self.is_away(a))
    }

    /// Goals scored and conceded by `team`, read from its actual side.
    pub fn goals_for_team(&self, team: &str) -> (u32, u32) {
        if self.is_home(team) {
            (self.home_goals(), self.away_goals())
        } else {
            (self.away_goals(), self.home_goals())
        }
    }
}

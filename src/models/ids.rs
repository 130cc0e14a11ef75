//! Deterministic ID generation using SHA256 hashing.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A deterministic match ID derived from a content hash.
///
/// Two uploads of the same fixture (same teams, same kickoff string)
/// always produce the same ID, so bets and saved predictions keep
/// pointing at the right match after a re-import.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchId(String);

impl MatchId {
    /// Hash `fields` joined with `|`; the ID is the first 16 hex digits.
    pub fn generate(fields: &[&str]) -> Self {
        let digest = Sha256::digest(fields.join("|").as_bytes());
        let mut id = hex::encode(digest);
        id.truncate(16);
        Self(id)
    }

    /// ID for a fixture. Team names are case-folded so the ID agrees with
    /// the case-insensitive team matching used by the statistics layer.
    pub fn for_fixture(home_team: &str, away_team: &str, date: &str) -> Self {
        let home = home_team.trim().to_lowercase();
        let away = away_team.trim().to_lowercase();
        Self::generate(&[&home, &away, date.trim()])
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MatchId({})", self.0)
    }
}

impl From<String> for MatchId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MatchId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

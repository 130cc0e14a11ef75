//! Simulated live V-sport ticker.
//!
//! Holds a small board of virtual fixtures and advances their status on
//! each refresh. Final scores come from an injected RNG so a seeded ticker
//! replays identically.

use chrono::{DateTime, Duration, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::models::{MarketOdds, VSportMatch, VSportStatus};

/// Seconds after kickoff at which a simulated match finishes.
pub const MATCH_LENGTH_SECS: i64 = 240;

/// Exclusive upper bounds for simulated final scores.
pub const MAX_HOME_GOALS: u32 = 4;
pub const MAX_AWAY_GOALS: u32 = 3;

/// Advance statuses against `now`.
///
/// Betting closes at kickoff; a match in progress completes
/// [`MATCH_LENGTH_SECS`] after kickoff with a random scoreline. Returns the
/// number of matches whose status changed.
pub fn update_match_statuses<R: Rng>(matches: &mut [VSportMatch], now: DateTime<Utc>, rng: &mut R) -> usize {
    let mut changed = 0;
    for m in matches.iter_mut() {
        match m.status {
            VSportStatus::BettingOpen if m.kickoff <= now => {
                m.status = VSportStatus::InProgress;
                changed += 1;
            }
            VSportStatus::InProgress if (now - m.kickoff).num_seconds() > MATCH_LENGTH_SECS => {
                m.status = VSportStatus::Completed;
                m.home_score = Some(rng.gen_range(0..MAX_HOME_GOALS));
                m.away_score = Some(rng.gen_range(0..MAX_AWAY_GOALS));
                changed += 1;
            }
            _ => continue,
        }
        debug!(id = %m.id, status = m.status.label(), "V-sport status changed");
    }
    changed
}

/// Countdown to kickoff as `m:ss`, or `Started` once it has passed.
pub fn time_until(kickoff: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (kickoff - now).num_seconds();
    if secs < 0 {
        return "Started".to_string();
    }
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// The opening board of virtual fixtures, timed relative to `now`.
pub fn demo_fixtures(now: DateTime<Utc>) -> Vec<VSportMatch> {
    let fixture = |n: u32,
                   home: &str,
                   away: &str,
                   offset_secs: i64,
                   status: VSportStatus,
                   odds: (f64, f64, f64),
                   score: Option<(u32, u32)>| VSportMatch {
        id: format!("vs-{n}"),
        home_team: home.to_string(),
        away_team: away.to_string(),
        kickoff: now + Duration::seconds(offset_secs),
        status,
        odds: MarketOdds {
            home: odds.0,
            draw: odds.1,
            away: odds.2,
        },
        home_score: score.map(|s| s.0),
        away_score: score.map(|s| s.1),
        round: 1,
    };

    vec![
        fixture(
            1,
            "Virtual Arsenal",
            "Virtual Chelsea",
            180,
            VSportStatus::BettingOpen,
            (2.4, 3.1, 2.9),
            None,
        ),
        fixture(
            2,
            "Virtual Man City",
            "Virtual Liverpool",
            420,
            VSportStatus::Upcoming,
            (1.9, 3.5, 3.8),
            None,
        ),
        fixture(
            3,
            "Virtual Tottenham",
            "Virtual Man United",
            -120,
            VSportStatus::InProgress,
            (2.2, 3.3, 3.1),
            Some((1, 0)),
        ),
        fixture(
            4,
            "Virtual Newcastle",
            "Virtual Aston Villa",
            -480,
            VSportStatus::Completed,
            (2.0, 3.4, 3.7),
            Some((2, 1)),
        ),
    ]
}

/// Board of simulated matches plus the RNG that settles them.
#[derive(Debug, Clone)]
pub struct Ticker {
    matches: Vec<VSportMatch>,
    rng: ChaCha8Rng,
}

impl Ticker {
    pub fn new(seed: u64, now: DateTime<Utc>) -> Self {
        Self::with_matches(seed, demo_fixtures(now))
    }

    pub fn with_matches(seed: u64, matches: Vec<VSportMatch>) -> Self {
        Self {
            matches,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn matches(&self) -> &[VSportMatch] {
        &self.matches
    }

    pub fn get(&self, id: &str) -> Option<&VSportMatch> {
        self.matches.iter().find(|m| m.id == id)
    }

    /// Advance every match to `now`.
    pub fn refresh(&mut self, now: DateTime<Utc>) -> &[VSportMatch] {
        let changed = update_match_statuses(&mut self.matches, now, &mut self.rng);
        info!(changed, "V-sport matches updated");
        &self.matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_demo_board() {
        let board = demo_fixtures(noon());
        assert_eq!(board.len(), 4);
        assert_eq!(board[0].id, "vs-1");
        assert_eq!(board[0].kickoff, noon() + Duration::minutes(3));
        assert_eq!(board[1].status, VSportStatus::Upcoming);
        assert_eq!(board[2].home_score, Some(1));
        assert_eq!(board[3].odds.away, 3.7);
    }

    #[test]
    fn test_status_transitions() {
        let mut board = demo_fixtures(noon());
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        // Nothing is due yet except the match that kicked off two minutes ago,
        // which still has two minutes to run.
        assert_eq!(update_match_statuses(&mut board, noon(), &mut rng), 0);

        // Five minutes on: vs-1 kicks off, vs-3 finishes
        let later = noon() + Duration::minutes(5);
        assert_eq!(update_match_statuses(&mut board, later, &mut rng), 2);
        assert_eq!(board[0].status, VSportStatus::InProgress);
        assert_eq!(board[1].status, VSportStatus::Upcoming);
        assert_eq!(board[2].status, VSportStatus::Completed);
        assert!(board[2].home_score.is_some_and(|g| g < MAX_HOME_GOALS));
        assert!(board[2].away_score.is_some_and(|g| g < MAX_AWAY_GOALS));

        // Completed matches keep their score
        assert_eq!(board[3].home_score, Some(2));
        assert_eq!(board[3].status, VSportStatus::Completed);
    }

    #[test]
    fn test_seeded_ticker_is_deterministic() {
        let run = || {
            let mut ticker = Ticker::new(42, noon());
            ticker.refresh(noon() + Duration::minutes(10));
            ticker.refresh(noon() + Duration::minutes(20));
            ticker.matches().to_vec()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_ticker_lookup() {
        let ticker = Ticker::new(1, noon());
        assert_eq!(
            ticker.get("vs-2").map(|m| m.home_team.as_str()),
            Some("Virtual Man City")
        );
        assert!(ticker.get("vs-99").is_none());
    }

    #[test]
    fn test_time_until() {
        let now = noon();
        assert_eq!(time_until(now + Duration::seconds(185), now), "3:05");
        assert_eq!(time_until(now, now), "0:00");
        assert_eq!(time_until(now - Duration::seconds(1), now), "Started");
    }
}

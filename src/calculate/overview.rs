//! Competition-wide statistics.

use crate::models::{LeagueStatistics, Match, Outcome, StandingsEntry, NO_TEAM};

use super::standings::calculate_standings;

/// Aggregate a whole competition.
///
/// An empty match list returns [`LeagueStatistics::empty`].
pub fn calculate_league_statistics(matches: &[Match]) -> LeagueStatistics {
    if matches.is_empty() {
        return LeagueStatistics::empty();
    }

    let completed: Vec<&Match> = matches.iter().filter(|m| m.is_completed()).collect();

    let total_goals: u32 = completed.iter().map(|m| m.total_goals()).sum();
    let count_outcome = |outcome: Outcome| completed.iter().filter(|m| m.outcome() == outcome).count() as u32;

    let most_goals_scored_in_match = completed.iter().map(|m| m.total_goals()).max().unwrap_or(0);

    let clean_sheets = completed
        .iter()
        .filter(|m| m.home_goals() == 0 || m.away_goals() == 0)
        .count() as u32;

    let standings = calculate_standings(matches);

    LeagueStatistics {
        total_matches: matches.len() as u32,
        completed_matches: completed.len() as u32,
        total_goals,
        average_goals_per_match: if completed.is_empty() {
            0.0
        } else {
            total_goals as f64 / completed.len() as f64
        },
        home_wins: count_outcome(Outcome::Home),
        away_wins: count_outcome(Outcome::Away),
        draws: count_outcome(Outcome::Draw),
        most_goals_scored_in_match,
        clean_sheets,
        top_scorer: top_scoring_team(&standings),
        most_clean_sheets: best_defence_team(&standings),
    }
}

/// Team with the most goals scored. Earlier table position wins ties.
pub fn top_scoring_team(standings: &[StandingsEntry]) -> String {
    standings
        .iter()
        .reduce(|best, current| if current.goals_for > best.goals_for { current } else { best })
        .map(|e| e.team.clone())
        .unwrap_or_else(|| NO_TEAM.to_string())
}

/// Team with the fewest goals conceded, standing in for clean-sheet counts.
pub fn best_defence_team(standings: &[StandingsEntry]) -> String {
    standings
        .iter()
        .reduce(|best, current| if current.goals_against < best.goals_against { current } else { best })
        .map(|e| e.team.clone())
        .unwrap_or_else(|| NO_TEAM.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::fixtures::small_league;

    #[test]
    fn test_empty_league() {
        let stats = calculate_league_statistics(&[]);
        assert_eq!(stats, LeagueStatistics::empty());
        assert_eq!(stats.total_matches, 0);
        assert_eq!(stats.top_scorer, "-");
    }

    #[test]
    fn test_small_league_overview() {
        let stats = calculate_league_statistics(&small_league());

        assert_eq!(stats.total_matches, 6);
        assert_eq!(stats.completed_matches, 6);
        assert_eq!(stats.total_goals, 15);
        assert!((stats.average_goals_per_match - 2.5).abs() < 1e-9);
        assert_eq!(stats.home_wins, 2);
        assert_eq!(stats.away_wins, 2);
        assert_eq!(stats.draws, 2);
        assert_eq!(stats.most_goals_scored_in_match, 4);
        // 0-0, 0-3, 4-0
        assert_eq!(stats.clean_sheets, 3);
        // Arsenal and Chelsea both scored 6; Arsenal sits higher
        assert_eq!(stats.top_scorer, "Arsenal");
        // Liverpool conceded 2
        assert_eq!(stats.most_clean_sheets, "Liverpool");
    }

    #[test]
    fn test_outcomes_sum_to_completed() {
        let mut matches = small_league();
        matches.push(Match::new("2024-03-01", "Arsenal", "Everton"));
        let stats = calculate_league_statistics(&matches);

        assert_eq!(stats.total_matches, 7);
        assert_eq!(stats.completed_matches, 6);
        assert_eq!(stats.home_wins + stats.away_wins + stats.draws, stats.completed_matches);
        assert!((stats.average_goals_per_match - stats.total_goals as f64 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_only_scheduled_matches_has_zero_average() {
        let matches = vec![Match::new("2024-03-01", "A", "B")];
        let stats = calculate_league_statistics(&matches);
        assert_eq!(stats.total_matches, 1);
        assert_eq!(stats.completed_matches, 0);
        assert_eq!(stats.average_goals_per_match, 0.0);
        // Both teams are listed in the table with no goals
        assert_eq!(stats.top_scorer, "A");
    }
}

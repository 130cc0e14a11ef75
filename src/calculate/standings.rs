//! League table aggregation.

use std::collections::HashMap;

use crate::models::{team_key, FormResult, Match, StandingsEntry, WinDrawLossRecord};

/// Number of results kept in a team's form guide.
pub const FORM_LENGTH: usize = 5;

#[derive(Default)]
struct TeamTally {
    name: String,
    record: WinDrawLossRecord,
    goals_for: u32,
    goals_against: u32,
    results: Vec<FormResult>,
}

impl TeamTally {
    fn add(&mut self, scored: u32, conceded: u32) {
        let result = FormResult::from_goals(scored, conceded);
        self.record.record(result);
        self.goals_for += scored;
        self.goals_against += conceded;
        self.results.push(result);
    }
}

/// Build the league table from a match list.
///
/// One entry per distinct team (case-insensitive) appearing in any match.
/// Only completed matches contribute results. Ranking: points, then goal
/// difference, then goals scored, then team name.
pub fn calculate_standings(matches: &[Match]) -> Vec<StandingsEntry> {
    let mut order: Vec<String> = Vec::new();
    let mut tallies: HashMap<String, TeamTally> = HashMap::new();

    for m in matches {
        for name in [&m.home_team, &m.away_team] {
            let key = team_key(name);
            tallies.entry(key.clone()).or_insert_with(|| {
                order.push(key);
                TeamTally {
                    name: name.trim().to_string(),
                    ..Default::default()
                }
            });
        }

        if !m.is_completed() {
            continue;
        }

        if let Some(home) = tallies.get_mut(&team_key(&m.home_team)) {
            home.add(m.home_goals(), m.away_goals());
        }
        if let Some(away) = tallies.get_mut(&team_key(&m.away_team)) {
            away.add(m.away_goals(), m.home_goals());
        }
    }

    let mut entries: Vec<StandingsEntry> = order
        .iter()
        .filter_map(|key| tallies.remove(key))
        .map(|tally| {
            let skip = tally.results.len().saturating_sub(FORM_LENGTH);
            StandingsEntry {
                position: 0,
                played: tally.record.total_games(),
                won: tally.record.wins,
                drawn: tally.record.draws,
                lost: tally.record.losses,
                goals_for: tally.goals_for,
                goals_against: tally.goals_against,
                goal_difference: i64::from(tally.goals_for) - i64::from(tally.goals_against),
                points: tally.record.points(),
                form: tally.results[skip..].to_vec(),
                team: tally.name,
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| b.goal_difference.cmp(&a.goal_difference))
            .then_with(|| b.goals_for.cmp(&a.goals_for))
            .then_with(|| team_key(&a.team).cmp(&team_key(&b.team)))
    });

    for (i, entry) in entries.iter_mut().enumerate() {
        entry.position = i as u32 + 1;
    }

    entries
}

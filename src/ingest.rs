//! CSV match ingestion.
//!
//! Turns an uploaded CSV file into [`Match`] values. Required columns are
//! `date,home_team,away_team,home_score,away_score`; `ht_home_score`,
//! `ht_away_score` and `venue` are optional.

use std::collections::{BTreeSet, HashMap};
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use regex::Regex;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::Match;

pub const REQUIRED_COLUMNS: [&str; 5] = ["date", "home_team", "away_team", "home_score", "away_score"];

/// Rows per round when no kickoff times are available.
pub const ROWS_PER_ROUND: usize = 8;

/// Date-time layouts tried after the recognised patterns.
const FALLBACK_DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
];

/// Date-only layouts tried last; the kickoff is midnight.
const FALLBACK_DATE_FORMATS: [&str; 7] = [
    "%Y/%m/%d",
    "%b %d %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("row {row}: invalid date '{value}'")]
    InvalidDate { row: usize, value: String },

    #[error("no valid matches found in CSV")]
    NoMatches,

    #[error("failed to read match file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid date pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Knobs for a single ingestion run.
#[derive(Debug, Clone, Copy)]
pub struct IngestOptions {
    /// Anchor date for time-only rows
    pub today: NaiveDate,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            today: Utc::now().date_naive(),
        }
    }
}

/// Compiled date recognisers.
struct DatePatterns {
    year_first: Regex,
    day_first: Regex,
    time_only: Regex,
    trailing_time: Regex,
}

impl DatePatterns {
    fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            year_first: Regex::new(r"^(\d{4})-(\d{2})-(\d{2})(?:\s+(\d{2}):(\d{2}))?$")?,
            day_first: Regex::new(r"^(\d{2})[/-](\d{2})[/-](\d{4})(?:\s+(\d{2}):(\d{2}))?$")?,
            time_only: Regex::new(r"^(\d{2}):(\d{2})$")?,
            trailing_time: Regex::new(r"(?:^|[\sT])(\d{2}:\d{2})(?::\d{2})?$")?,
        })
    }

    /// `HH:MM` token at the end of a date cell, if any.
    fn kickoff_token<'a>(&self, value: &'a str) -> Option<&'a str> {
        self.trailing_time
            .captures(value)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }

    fn parse(&self, value: &str, today: NaiveDate) -> Option<NaiveDateTime> {
        let num = |caps: &regex::Captures<'_>, i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
        let time_of = |caps: &regex::Captures<'_>| match (num(caps, 4), num(caps, 5)) {
            (Some(h), Some(m)) => NaiveTime::from_hms_opt(h, m, 0),
            _ => NaiveTime::from_hms_opt(0, 0, 0),
        };

        if let Some(caps) = self.year_first.captures(value) {
            let date = NaiveDate::from_ymd_opt(num(&caps, 1)? as i32, num(&caps, 2)?, num(&caps, 3)?)?;
            return Some(date.and_time(time_of(&caps)?));
        }
        if let Some(caps) = self.day_first.captures(value) {
            let date = NaiveDate::from_ymd_opt(num(&caps, 3)? as i32, num(&caps, 2)?, num(&caps, 1)?)?;
            return Some(date.and_time(time_of(&caps)?));
        }
        if let Some(caps) = self.time_only.captures(value) {
            let time = NaiveTime::from_hms_opt(num(&caps, 1)?, num(&caps, 2)?, 0)?;
            return Some(today.and_time(time));
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(dt.naive_utc());
        }
        FALLBACK_DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
            .or_else(|| {
                FALLBACK_DATE_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
    }
}

/// Parse a date cell.
///
/// Accepts `YYYY-MM-DD`, `DD/MM/YYYY`, `DD-MM-YYYY` (each optionally
/// followed by ` HH:MM`) and a bare `HH:MM` (placed on `today`). Anything
/// else goes through RFC 3339 and the fallback layouts: `YYYY-MM-DDTHH:MM[:SS]`,
/// `YYYY-MM-DD HH:MM:SS`, `YYYY/MM/DD[ HH:MM[:SS]]` and month-name forms such
/// as `Jan 5 2024` or `5 January 2024`. Errors report row 0 when used
/// outside a file.
pub fn parse_csv_date(value: &str, today: NaiveDate) -> Result<NaiveDateTime, IngestError> {
    DatePatterns::new()?
        .parse(value.trim(), today)
        .ok_or_else(|| IngestError::InvalidDate {
            row: 0,
            value: value.to_string(),
        })
}

fn clean(cell: &str) -> &str {
    cell.trim().trim_matches('"').trim()
}

/// Score cell: empty means not played, garbage is coerced to 0.
fn score_cell(cell: Option<&str>, column: &str, row: usize) -> Option<u32> {
    let value = clean(cell?);
    if value.is_empty() {
        return None;
    }
    match value.parse::<u32>() {
        Ok(n) => Some(n),
        Err(_) => {
            warn!(row, column, value, "Non-numeric score, using 0");
            Some(0)
        }
    }
}

/// One data row with the fields ingestion cares about.
struct RawRow {
    row: usize,
    date: String,
    home_team: String,
    away_team: String,
    cells: csv::StringRecord,
}

/// Parse a CSV document into matches.
pub fn parse_matches_csv<R: Read>(reader: R, options: &IngestOptions) -> Result<Vec<Match>, IngestError> {
    let patterns = DatePatterns::new()?;

    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns: HashMap<String, usize> = csv_reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| (clean(h).to_string(), i))
        .collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !columns.contains_key(**c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns(missing));
    }

    let cell = |record: &csv::StringRecord, column: &str| -> Option<String> {
        columns
            .get(column)
            .and_then(|&i| record.get(i))
            .map(|v| clean(v).to_string())
    };

    let mut rows = Vec::new();
    for (i, record) in csv_reader.records().enumerate() {
        let record = record?;
        let row = i + 1;
        let (Some(date), Some(home_team), Some(away_team)) = (
            cell(&record, "date").filter(|v| !v.is_empty()),
            cell(&record, "home_team").filter(|v| !v.is_empty()),
            cell(&record, "away_team").filter(|v| !v.is_empty()),
        ) else {
            debug!(row, "Skipping row without date or teams");
            continue;
        };
        rows.push(RawRow {
            row,
            date,
            home_team,
            away_team,
            cells: record,
        });
    }

    // Distinct kickoff times, in clock order, become rounds 1..n
    let kickoffs: BTreeSet<&str> = rows.iter().filter_map(|r| patterns.kickoff_token(&r.date)).collect();
    let round_of: HashMap<&str, usize> = kickoffs.iter().enumerate().map(|(i, t)| (*t, i + 1)).collect();

    let has_column = |column: &str| columns.contains_key(column);

    let mut matches = Vec::with_capacity(rows.len());
    for (index, raw) in rows.iter().enumerate() {
        let round = patterns
            .kickoff_token(&raw.date)
            .and_then(|t| round_of.get(t).copied())
            .unwrap_or(index / ROWS_PER_ROUND + 1);

        let date = if patterns.time_only.is_match(&raw.date) {
            let day = options.today + Duration::weeks(round as i64 - 1);
            format!("{} {}", day.format("%Y-%m-%d"), raw.date)
        } else {
            raw.date.clone()
        };

        let kickoff = patterns
            .parse(&date, options.today)
            .ok_or_else(|| IngestError::InvalidDate {
                row: raw.row,
                value: raw.date.clone(),
            })?;

        let score = |column: &str| score_cell(cell(&raw.cells, column).as_deref(), column, raw.row);
        let half_time = |column: &str| {
            if has_column(column) {
                score(column)
            } else {
                Some(0)
            }
        };

        let mut m = Match::new(date, raw.home_team.as_str(), raw.away_team.as_str())
            .with_round(format!("Round {}", round))
            .with_kickoff(kickoff);
        m.home_score = score("home_score");
        m.away_score = score("away_score");
        m.ht_home_score = half_time("ht_home_score");
        m.ht_away_score = half_time("ht_away_score");
        m.venue = cell(&raw.cells, "venue").filter(|v| !v.is_empty());

        matches.push(m);
    }

    if matches.is_empty() {
        return Err(IngestError::NoMatches);
    }

    info!(
        matches = matches.len(),
        rounds = round_of.len(),
        "Parsed matches from CSV"
    );
    Ok(matches)
}

/// Read and parse a CSV file from disk.
pub fn load_matches_file(path: &Path, options: &IngestOptions) -> Result<Vec<Match>, IngestError> {
    info!("Loading matches from {}", path.display());
    let file = std::fs::File::open(path)?;
    parse_matches_csv(file, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn opts() -> IngestOptions {
        IngestOptions {
            today: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
        }
    }

    fn parse(text: &str) -> Result<Vec<Match>, IngestError> {
        parse_matches_csv(text.as_bytes(), &opts())
    }

    #[test]
    fn test_minimal_row() {
        let matches = parse("date,home_team,away_team,home_score,away_score\n2024-01-01,A,B,2,1\n").unwrap();
        assert_eq!(matches.len(), 1);

        let m = &matches[0];
        assert_eq!(m.home_team, "A");
        assert_eq!(m.away_team, "B");
        assert_eq!(m.home_score, Some(2));
        assert_eq!(m.away_score, Some(1));
        assert_eq!(m.round, "Round 1");
        // No half-time columns at all
        assert_eq!(m.ht_home_score, Some(0));
        assert_eq!(m.ht_away_score, Some(0));
        assert_eq!(m.kickoff, NaiveDate::from_ymd_opt(2024, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0)));
    }

    #[test]
    fn test_missing_columns_are_named() {
        let err = parse("date,home_team,away_team,home_score\n2024-01-01,A,B,2\n").unwrap_err();
        match err {
            IngestError::MissingColumns(cols) => assert_eq!(cols, vec!["away_score".to_string()]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_headers_trimmed_and_unquoted() {
        let text = " \"date\" , home_team ,\"away_team\",home_score,away_score\n2024-01-01,A,B,0,0\n";
        assert_eq!(parse(text).unwrap().len(), 1);
    }

    #[test]
    fn test_score_coercion() {
        let text = "date,home_team,away_team,home_score,away_score,ht_home_score,ht_away_score\n\
                    2024-01-01,A,B,x,1,,\n\
                    2024-01-08,C,D,,,,\n";
        let matches = parse(text).unwrap();

        assert_eq!(matches[0].home_score, Some(0));
        assert_eq!(matches[0].away_score, Some(1));
        assert_eq!(matches[0].ht_home_score, None);
        assert!(matches[0].is_completed());
        assert!(!matches[0].has_half_time());

        assert!(!matches[1].is_completed());
    }

    #[test]
    fn test_rows_without_teams_skipped() {
        let text = "date,home_team,away_team,home_score,away_score\n\
                    2024-01-01,A,B,1,0\n\
                    2024-01-02,,B,1,0\n\
                    ,A,B,1,0\n";
        assert_eq!(parse(text).unwrap().len(), 1);
    }

    #[test]
    fn test_no_rows_is_an_error() {
        let err = parse("date,home_team,away_team,home_score,away_score\n").unwrap_err();
        assert!(matches!(err, IngestError::NoMatches));
    }

    #[test]
    fn test_invalid_date_reports_row() {
        let text = "date,home_team,away_team,home_score,away_score\n\
                    2024-01-01,A,B,1,0\n\
                    next tuesday,C,D,1,0\n";
        match parse(text).unwrap_err() {
            IngestError::InvalidDate { row, value } => {
                assert_eq!(row, 2);
                assert_eq!(value, "next tuesday");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rounds_from_kickoff_times() {
        let text = "date,home_team,away_team,home_score,away_score\n\
                    18:30,A,B,1,0\n\
                    18:00,C,D,1,1\n\
                    18:30,E,F,0,2\n";
        let matches = parse(text).unwrap();
        let rounds: Vec<&str> = matches.iter().map(|m| m.round.as_str()).collect();
        assert_eq!(rounds, vec!["Round 2", "Round 1", "Round 2"]);

        // Time-only rows are spread one week per round from today
        assert_eq!(matches[0].date, "2024-03-11 18:30");
        assert_eq!(matches[1].date, "2024-03-04 18:00");
        assert_eq!(
            matches[0].kickoff,
            NaiveDate::from_ymd_opt(2024, 3, 11).and_then(|d| d.and_hms_opt(18, 30, 0))
        );
    }

    #[test]
    fn test_rounds_fall_back_to_row_index() {
        let mut text = String::from("date,home_team,away_team,home_score,away_score\n");
        for i in 0..10 {
            text.push_str(&format!("2024-01-01,H{i},A{i},1,0\n"));
        }
        let matches = parse(&text).unwrap();
        assert_eq!(matches[7].round, "Round 1");
        assert_eq!(matches[8].round, "Round 2");
    }

    #[test]
    fn test_venue_column() {
        let text = "date,home_team,away_team,home_score,away_score,venue\n\
                    2024-01-01,A,B,1,0,Emirates\n\
                    2024-01-02,C,D,1,0,\n";
        let matches = parse(text).unwrap();
        assert_eq!(matches[0].venue.as_deref(), Some("Emirates"));
        assert_eq!(matches[1].venue, None);
    }

    #[test]
    fn test_parse_csv_date_formats() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let ymd = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap();

        assert_eq!(parse_csv_date("2024-05-06", today).unwrap(), ymd(2024, 5, 6));
        assert_eq!(parse_csv_date("06/05/2024", today).unwrap(), ymd(2024, 5, 6));
        assert_eq!(parse_csv_date("06-05-2024", today).unwrap(), ymd(2024, 5, 6));
        assert_eq!(
            parse_csv_date("06/05/2024 15:45", today).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 6).unwrap().and_hms_opt(15, 45, 0).unwrap()
        );
        assert_eq!(
            parse_csv_date("20:15", today).unwrap(),
            today.and_hms_opt(20, 15, 0).unwrap()
        );
        assert_eq!(
            parse_csv_date("2024-05-06T12:00:00Z", today).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 6).unwrap().and_hms_opt(12, 0, 0).unwrap()
        );
        assert!(parse_csv_date("31/02/2024", today).is_err());
        assert!(parse_csv_date("soon", today).is_err());
    }

    #[test]
    fn test_parse_csv_date_fallback_layouts() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let at = |y, m, d, h, min, s| NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, s).unwrap();

        assert_eq!(parse_csv_date("2024-01-01 15:00:00", today).unwrap(), at(2024, 1, 1, 15, 0, 0));
        assert_eq!(parse_csv_date("2024/01/01", today).unwrap(), at(2024, 1, 1, 0, 0, 0));
        assert_eq!(parse_csv_date("2024/01/01 19:45", today).unwrap(), at(2024, 1, 1, 19, 45, 0));
        assert_eq!(parse_csv_date("Jan 5 2024", today).unwrap(), at(2024, 1, 5, 0, 0, 0));
        assert_eq!(parse_csv_date("Jan 5, 2024", today).unwrap(), at(2024, 1, 5, 0, 0, 0));
        assert_eq!(parse_csv_date("5 Jan 2024", today).unwrap(), at(2024, 1, 5, 0, 0, 0));
        assert_eq!(parse_csv_date("5 January 2024", today).unwrap(), at(2024, 1, 5, 0, 0, 0));
        assert!(parse_csv_date("2024/13/01", today).is_err());
    }

    #[test]
    fn test_upload_with_seconds_in_kickoff() {
        let text = "date,home_team,away_team,home_score,away_score\n\
                    2024-01-01 15:00:00,A,B,1,0\n\
                    2024-01-01 17:30:00,C,D,2,2\n";
        let matches = parse(text).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(
            matches[0].kickoff,
            NaiveDate::from_ymd_opt(2024, 1, 1).and_then(|d| d.and_hms_opt(15, 0, 0))
        );
        // Rounds come from the HH:MM part, not minutes and seconds
        assert_eq!(matches[0].round, "Round 1");
        assert_eq!(matches[1].round, "Round 2");
    }

    #[test]
    fn test_load_matches_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "date,home_team,away_team,home_score,away_score").unwrap();
        writeln!(file, "2024-01-01,A,B,3,3").unwrap();

        let matches = load_matches_file(file.path(), &opts()).unwrap();
        assert_eq!(matches[0].outcome(), crate::models::Outcome::Draw);

        let missing = load_matches_file(Path::new("/nonexistent/matches.csv"), &opts());
        assert!(matches!(missing, Err(IngestError::Io(_))));
    }
}

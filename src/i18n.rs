//! Translation lookup for labels produced by the API.
//!
//! The active language is an explicit [`Translator`] value handed to the
//! calls that produce labels. Lookups fall back to English, then to the key
//! itself.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    #[default]
    Hu,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hu => "hu",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("unsupported language '{0}' (expected en or hu)")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "hu" => Ok(Language::Hu),
            other => Err(UnknownLanguage(other.to_string())),
        }
    }
}

type Table = &'static [(&'static str, &'static str)];

const EN: Table = &[
    ("predictions.title", "Match Predictions"),
    ("predictions.both_teams_score", "Both teams score"),
    ("predictions.draw_likelihood", "Draw likelihood"),
    ("predictions.home_win", "Home win"),
    ("predictions.away_win", "Away win"),
    ("predictions.draw", "Draw"),
    ("predictions.reversal", "Reversal"),
    ("predictions.high_value", "High value bet"),
    ("predictions.confidence", "Confidence"),
    ("predictions.odds", "Odds"),
    ("predictions.htft", "Half-time/Full-time"),
    ("predictions.no_data", "No data available"),
    ("predictions.model.historical", "Previous results between the two teams"),
    ("predictions.model.recent_form", "Recent form (last 5 matches)"),
    ("predictions.model.home_advantage", "Home advantage (1.2x multiplier for home team)"),
    ("predictions.model.average_goals", "Average goals scored and conceded by each team"),
    ("predictions.total", "Total predictions"),
    ("predictions.successful", "Successful predictions"),
    ("predictions.high_confidence", "High confidence"),
    ("predictions.hit", "Hit"),
    ("predictions.miss", "Miss"),
    ("pattern.both_teams_score", "Both teams score"),
    ("pattern.draw", "Draw"),
    ("pattern.ht_ft_reversal", "HT/FT reversal"),
    ("pattern.specific_score", "Specific score"),
    ("htft.home_home", "Home - Home"),
    ("htft.home_draw", "Home - Draw"),
    ("htft.home_away", "Home - Away"),
    ("htft.draw_home", "Draw - Home"),
    ("htft.draw_draw", "Draw - Draw"),
    ("htft.draw_away", "Draw - Away"),
    ("htft.away_home", "Away - Home"),
    ("htft.away_draw", "Away - Draw"),
    ("htft.away_away", "Away - Away"),
    ("vsport.upcoming", "Upcoming"),
    ("vsport.betting_open", "Betting Open"),
    ("vsport.in_progress", "In Progress"),
    ("vsport.completed", "Completed"),
    ("vsport.started", "Started"),
];

// Hungarian has no V-sport strings; those fall back to English.
const HU: Table = &[
    ("predictions.title", "Mérkőzés Előrejelzések"),
    ("predictions.both_teams_score", "Mindkét csapat szerez gólt"),
    ("predictions.draw_likelihood", "Döntetlen esélye"),
    ("predictions.home_win", "Hazai győzelem"),
    ("predictions.away_win", "Vendég győzelem"),
    ("predictions.draw", "Döntetlen"),
    ("predictions.reversal", "Fordítás"),
    ("predictions.high_value", "Magas értékű fogadás"),
    ("predictions.confidence", "Megbízhatóság"),
    ("predictions.odds", "Szorzó"),
    ("predictions.htft", "Félidő/végeredmény"),
    ("predictions.no_data", "Nincs elérhető adat"),
    ("predictions.model.historical", "Korábbi eredmények a két csapat között"),
    ("predictions.model.recent_form", "Legutóbbi forma (utolsó 5 mérkőzés)"),
    ("predictions.model.home_advantage", "Hazai pálya előny (1.2x szorzó a hazai csapatnak)"),
    ("predictions.model.average_goals", "Átlagos szerzett és kapott gólok csapatonként"),
    ("predictions.total", "Összes előrejelzés"),
    ("predictions.successful", "Sikeres előrejelzések"),
    ("predictions.high_confidence", "Magas megbízhatóság"),
    ("predictions.hit", "Talált"),
    ("predictions.miss", "Téves"),
    ("pattern.both_teams_score", "Mindkét csapat szerez gólt"),
    ("pattern.draw", "Döntetlen"),
    ("pattern.ht_ft_reversal", "Félidő/végeredmény fordulás"),
    ("pattern.specific_score", "Pontos eredmény"),
    ("htft.home_home", "Hazai - Hazai"),
    ("htft.home_draw", "Hazai - Döntetlen"),
    ("htft.home_away", "Hazai - Vendég"),
    ("htft.draw_home", "Döntetlen - Hazai"),
    ("htft.draw_draw", "Döntetlen - Döntetlen"),
    ("htft.draw_away", "Döntetlen - Vendég"),
    ("htft.away_home", "Vendég - Hazai"),
    ("htft.away_draw", "Vendég - Döntetlen"),
    ("htft.away_away", "Vendég - Vendég"),
];

fn table(language: Language) -> Table {
    match language {
        Language::En => EN,
        Language::Hu => HU,
    }
}

fn lookup(table: Table, key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Label lookup for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Translator {
    language: Language,
}

impl Translator {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Translate `key`, falling back to English and then to the key.
    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        lookup(table(self.language), key)
            .or_else(|| lookup(EN, key))
            .unwrap_or(key)
    }

    /// Every known key with its label in this language.
    pub fn entries(&self) -> BTreeMap<&'static str, &'static str> {
        EN.iter()
            .map(|(key, english)| (*key, lookup(table(self.language), key).unwrap_or(*english)))
            .collect()
    }
}

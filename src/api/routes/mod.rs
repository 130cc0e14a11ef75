pub mod bets;
pub mod i18n;
pub mod matches;
pub mod predictions;
pub mod stats;
pub mod vsport;

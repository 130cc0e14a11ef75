//! # matchday
//!
//! Football match analytics: league tables, outcome predictions and
//! value-bet tracking over a CSV match list.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (matches, standings, predictions, bets)
//! - **calculate**: Statistics, predictors and value calculators
//! - **ingest**: CSV match import
//! - **i18n**: Label translation
//! - **session**: Prediction history and bet tracking
//! - **ticker**: Simulated V-sport match board
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod i18n;
pub mod ingest;
pub mod models;
pub mod session;
pub mod ticker;

pub use models::*;

//! Core data models for match analytics.

mod ids;
mod match_record;
mod prediction;
mod stats;
mod value_bet;
mod vsport;

pub use ids::*;
pub use match_record::*;
pub use prediction::*;
pub use stats::*;
pub use value_bet::*;
pub use vsport::*;

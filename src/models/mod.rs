//! Core data models for the league tracker.

mod match_record;
mod player;
mod stats;

pub use match_record::*;
pub use player::*;
pub use stats::*;

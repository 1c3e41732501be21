//! # League Tracker
//!
//! A doubles league tracker: enter match results, get standings and
//! per-player statistics.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (players, matches, stats)
//! - **canonical**: Team name canonicalization
//! - **calculate**: Standings, player statistics and match history
//! - **ingest**: Bulk text parsing and match submission
//! - **roster**: League setup from a player/team list
//! - **storage**: Player and match persistence (JSONL)
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod canonical;
pub mod config;
pub mod ingest;
pub mod models;
pub mod roster;
pub mod storage;

pub use models::*;

//! Game History Module
//!
//! Session store for finished games. Keeps an append-only log of completed
//! games and a running aggregate per player.
//!
//! ## Usage
//!
//! The session layer calls `record_game(...)` once, on the transition into
//! `Finished`. Everything else here is read-only.
//!
//! ## Storage
//!
//! - StableVec for the game log (unlimited retention)
//! - StableBTreeMap for per-player totals
//! - Memory IDs: 10 (records), 11 (totals)
//!
//! ## Statistics
//!
//! Net gain of a game is the accepted offer minus the player's case value when
//! a deal was made, and 0 when the player kept the case.

mod types;
mod storage;
mod collector;
mod queries;

pub use types::{GameRecord, PlayerStats};
pub use collector::record_game;
pub use queries::{get_player_stats, get_recent_games, get_total_games};

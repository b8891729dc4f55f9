//! Deal or No Deal Backend
//!
//! **Design Philosophy:**
//! Single-player Deal or No Deal. The player stakes an amount, picks one of 26
//! briefcases and eliminates the rest over ten scheduled rounds while a banker
//! makes escalating offers.
//!
//! **Game Core:**
//! - Pure reducer over a per-player session (`game::reduce`)
//! - Banker offer: 30% of the expected value in round 1, +10 points per round,
//!   capped at 95%, rounded to a nice number never above the expected value
//! - Prize ladder scaled so the top case is 5x the stake
//!
//! **Transparency & Fairness:**
//! - Randomness: IC VRF (raw_rand) - no fallback
//! - SHA-256 hash of each session seed is published with the session
//! - Case values stay hidden from clients until opened

use candid::Principal;
use ic_cdk::{init, pre_upgrade, post_upgrade, query, update};
use ic_stable_structures::memory_manager::{MemoryManager, VirtualMemory};
use ic_stable_structures::DefaultMemoryImpl;
use std::cell::RefCell;

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod game;
pub mod history;
pub mod memory_ids;
pub mod offer;
pub mod randomness;
pub mod rounds;
pub mod session;
pub mod types;
pub mod values;

#[cfg(test)]
mod tests;

pub use game::{reduce, session_view, GameAction};
pub use history::{GameRecord, PlayerStats};
pub use types::*;

// ============================================================================
// MEMORY MANAGEMENT
// ============================================================================

pub type Memory = VirtualMemory<DefaultMemoryImpl>;

thread_local! {
    pub static MEMORY_MANAGER: RefCell<MemoryManager<DefaultMemoryImpl>> =
        RefCell::new(MemoryManager::init(DefaultMemoryImpl::default()));
}

// ============================================================================
// LIFECYCLE HOOKS
// ============================================================================

#[init]
fn init() {
    ic_cdk::println!("Deal or No Deal Backend Initialized - 26 cases, top prize 5x stake");
}

#[pre_upgrade]
fn pre_upgrade() {
    ic_cdk::println!("Pre-upgrade: state persists automatically");
}

#[post_upgrade]
fn post_upgrade() {
    ic_cdk::println!(
        "Post-upgrade: {} finished games on record",
        history::get_total_games()
    );
}

// ============================================================================
// GAME ENDPOINTS
// ============================================================================

/// Stake an amount and deal a fresh set of cases.
/// Out-of-range stakes are clamped to 50..=1000 units.
#[update]
async fn set_stake(amount: u64) -> Result<SessionView, GameError> {
    let caller = ic_cdk::api::msg_caller();
    let seed = randomness::fetch_seed()
        .await
        .map_err(GameError::RandomnessUnavailable)?;
    session::apply(caller, GameAction::SetStake { amount, seed }, ic_cdk::api::time())
}

#[update]
fn select_case(case_id: u8) -> Result<SessionView, GameError> {
    play(GameAction::SelectPlayerCase(case_id))
}

#[update]
fn open_case(case_id: u8) -> Result<SessionView, GameError> {
    play(GameAction::OpenCase(case_id))
}

/// Ask the banker for an offer before the round quota is reached
#[update]
fn request_offer() -> Result<SessionView, GameError> {
    play(GameAction::RequestOfferEarly)
}

#[update]
fn accept_deal() -> Result<SessionView, GameError> {
    play(GameAction::AcceptDeal)
}

#[update]
fn reject_deal() -> Result<SessionView, GameError> {
    play(GameAction::RejectDeal)
}

#[update]
fn reset_game() -> Result<SessionView, GameError> {
    play(GameAction::Reset)
}

fn play(action: GameAction) -> Result<SessionView, GameError> {
    session::apply(ic_cdk::api::msg_caller(), action, ic_cdk::api::time())
}

#[query]
fn get_session() -> SessionView {
    session::get_session_view(ic_cdk::api::msg_caller())
}

// ============================================================================
// SNAPSHOT ENDPOINTS
// ============================================================================

/// Snapshot of the caller's session; only available between games
#[query]
fn export_session() -> Result<String, GameError> {
    session::export_session(ic_cdk::api::msg_caller())
}

#[update]
fn import_session(snapshot: String) -> Result<SessionView, GameError> {
    session::import_session(ic_cdk::api::msg_caller(), &snapshot)
}

// ============================================================================
// STATISTICS ENDPOINTS
// ============================================================================

#[query]
fn get_my_stats() -> PlayerStats {
    history::get_player_stats(ic_cdk::api::msg_caller())
}

#[query]
fn get_player_stats(player: Principal) -> PlayerStats {
    history::get_player_stats(player)
}

/// Caller's most recent finished games, newest first (max 100)
#[query]
fn get_recent_games(limit: u32) -> Vec<GameRecord> {
    history::get_recent_games(ic_cdk::api::msg_caller(), limit)
}

#[query]
fn get_total_games() -> u64 {
    history::get_total_games()
}

// ============================================================================
// GAME INFO QUERY ENDPOINTS
// ============================================================================

#[query]
fn get_round_schedule() -> Vec<RoundDescriptor> {
    rounds::round_schedule()
}

/// Prize board for a stake, before playing
#[query]
fn get_value_board(stake: u64) -> Vec<BoardEntry> {
    values::preview_board(stake)
}

/// Greet a player
#[query]
fn greet(name: String) -> String {
    format!(
        "Welcome to OpenHouse Deal or No Deal, {}! 26 cases, one banker. Deal or no deal?",
        name
    )
}

ic_cdk::export_candid!();

use candid::Principal;
use ic_stable_structures::{StableBTreeMap, memory_manager::MemoryId};
use std::cell::RefCell;

use crate::game::{self, GameAction};
use crate::history;
use crate::memory_ids::ACTIVE_SESSIONS_MEMORY_ID;
use crate::types::{to_display_units, GameError, GamePhase, GameSession, SessionView};
use crate::{MEMORY_MANAGER, Memory};

// =============================================================================
// STATE
// =============================================================================

thread_local! {
    /// One live session per player; a missing entry means a fresh session
    static ACTIVE_SESSIONS: RefCell<StableBTreeMap<Principal, GameSession, Memory>> = RefCell::new(
        StableBTreeMap::init(
            MEMORY_MANAGER.with(|m| m.borrow().get(MemoryId::new(ACTIVE_SESSIONS_MEMORY_ID)))
        )
    );
}

fn log(message: &str) {
    #[cfg(target_arch = "wasm32")]
    ic_cdk::println!("{}", message);
    #[cfg(not(target_arch = "wasm32"))]
    println!("{}", message);
}

fn load(player: Principal) -> GameSession {
    ACTIVE_SESSIONS.with(|s| s.borrow().get(&player).unwrap_or_default())
}

fn save(player: Principal, session: GameSession) {
    ACTIVE_SESSIONS.with(|s| {
        s.borrow_mut().insert(player, session);
    });
}

// =============================================================================
// ORCHESTRATION
// =============================================================================

/// Run `action` against the player's session and persist the result.
///
/// The session is saved before anything is written to history. A game that
/// reaches `Finished` is recorded exactly once, on that transition.
pub fn apply(player: Principal, action: GameAction, now: u64) -> Result<SessionView, GameError> {
    let current = load(player);
    let next = game::reduce(&current, &action).map_err(|e| {
        log(&format!("Rejected {:?} for {}: {}", action, player, e));
        e
    })?;

    let just_finished = current.phase != GamePhase::Finished && next.phase == GamePhase::Finished;
    save(player, next.clone());

    if just_finished {
        if let Some(outcome) = next.outcome() {
            match history::record_game(player, &outcome, now) {
                Ok(game_id) => log(&format!(
                    "Game {} finished for {}: deal={}, winnings={:.2}",
                    game_id, player, outcome.deal_accepted, to_display_units(outcome.winnings)
                )),
                Err(e) => log(&format!("Failed to record game for {}: {}", player, e)),
            }
        }
    }

    Ok(game::session_view(&next))
}

pub fn get_session_view(player: Principal) -> SessionView {
    game::session_view(&load(player))
}

// =============================================================================
// SNAPSHOTS
// =============================================================================

/// Snapshots only exist between games, when no case value is secret.
fn is_at_rest(phase: GamePhase) -> bool {
    matches!(phase, GamePhase::AwaitingStake | GamePhase::Finished)
}

/// The player's session as JSON. Refused while a game is in play.
pub fn export_session(player: Principal) -> Result<String, GameError> {
    let session = load(player);
    if !is_at_rest(session.phase) {
        return Err(GameError::invalid_transition("export the session", session.phase));
    }
    serde_json::to_string(&session).map_err(|e| GameError::InvalidSnapshot(e.to_string()))
}

/// Replace the player's session with a snapshot, after validating it.
///
/// Only idle or finished sessions are accepted, so a snapshot can never put a
/// game in play with values the player already knows.
pub fn import_session(player: Principal, snapshot: &str) -> Result<SessionView, GameError> {
    let session: GameSession =
        serde_json::from_str(snapshot).map_err(|e| GameError::InvalidSnapshot(e.to_string()))?;
    if !is_at_rest(session.phase) {
        return Err(GameError::InvalidSnapshot(format!(
            "Cannot import a game in progress ({:?})",
            session.phase
        )));
    }
    session.check_invariants().map_err(GameError::InvalidSnapshot)?;

    let view = game::session_view(&session);
    save(player, session);
    log(&format!("Imported session for {} at {:?}", player, view.phase));
    Ok(view)
}

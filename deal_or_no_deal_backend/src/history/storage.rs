use ic_stable_structures::{StableBTreeMap, StableVec, memory_manager::MemoryId};
use candid::Principal;
use std::cell::RefCell;
use crate::{MEMORY_MANAGER, Memory};
use crate::memory_ids::{GAME_RECORDS_MEMORY_ID, PLAYER_TOTALS_MEMORY_ID};
use super::types::{GameRecord, PlayerTotals};

thread_local! {
    /// Finished games - append-only, never deleted
    pub static GAME_RECORDS: RefCell<StableVec<GameRecord, Memory>> = RefCell::new(
        StableVec::init(
            MEMORY_MANAGER.with(|m| m.borrow().get(MemoryId::new(GAME_RECORDS_MEMORY_ID)))
        )
    );

    /// Aggregate per player, kept in step with GAME_RECORDS
    pub static PLAYER_TOTALS: RefCell<StableBTreeMap<Principal, PlayerTotals, Memory>> = RefCell::new(
        StableBTreeMap::init(
            MEMORY_MANAGER.with(|m| m.borrow().get(MemoryId::new(PLAYER_TOTALS_MEMORY_ID)))
        )
    );
}

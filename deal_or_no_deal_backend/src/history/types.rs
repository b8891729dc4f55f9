use candid::{CandidType, Deserialize, Principal};
use ic_stable_structures::{Storable, storable::Bound};
use serde::Serialize;
use std::borrow::Cow;

/// One finished game - stored permanently
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct GameRecord {
    /// Position in the game log
    pub game_id: u64,
    pub player: Principal,
    /// Value inside the player's own case (decimals)
    pub player_case_value: u64,
    /// Offer taken, None when the player kept the case (decimals)
    pub accepted_offer: Option<u64>,
    pub cases_opened: u8,
    pub deal_accepted: bool,
    /// Completion time (nanoseconds since epoch)
    pub completed_at: u64,
}

impl GameRecord {
    /// Accepted offer minus case value on a deal, 0 otherwise. SIGNED.
    pub fn net_gain(&self) -> i64 {
        match (self.deal_accepted, self.accepted_offer) {
            (true, Some(offer)) => offer as i64 - self.player_case_value as i64,
            _ => 0,
        }
    }
}

impl Storable for GameRecord {
    fn to_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Owned(candid::encode_one(self).expect(
            "CRITICAL: Failed to encode GameRecord. \
             This should never happen unless there's a bug in candid serialization."
        ))
    }

    fn into_bytes(self) -> Vec<u8> {
        self.to_bytes().into_owned()
    }

    fn from_bytes(bytes: Cow<'_, [u8]>) -> Self {
        candid::decode_one(&bytes).expect(
            "CRITICAL: Failed to decode GameRecord from stable storage. \
             This indicates storage corruption or an incompatible canister upgrade."
        )
    }

    const BOUND: Bound = Bound::Bounded {
        max_size: 256,
        is_fixed_size: false,
    };
}

/// Game ids kept per player for recent-games lookups
pub const RECENT_GAMES_KEPT: usize = 100;

/// Running aggregate per player - updated on every recorded game
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayerTotals {
    pub games_played: u64,
    pub deals_accepted: u64,
    /// Best single-game net gain, never below 0 (decimals)
    pub highest_net_gain: i64,
    /// Sum of net gains across all games (decimals, can be negative)
    pub total_net_gain: i64,
    /// Ids into the game log, oldest first, at most RECENT_GAMES_KEPT
    #[serde(default)]
    pub recent_game_ids: Vec<u64>,
}

impl PlayerTotals {
    pub fn remember_game(&mut self, game_id: u64) {
        self.recent_game_ids.push(game_id);
        if self.recent_game_ids.len() > RECENT_GAMES_KEPT {
            let excess = self.recent_game_ids.len() - RECENT_GAMES_KEPT;
            self.recent_game_ids.drain(..excess);
        }
    }
}

impl Storable for PlayerTotals {
    fn to_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Owned(serde_json::to_vec(self).expect(
            "CRITICAL: Failed to encode PlayerTotals."
        ))
    }

    fn into_bytes(self) -> Vec<u8> {
        self.to_bytes().into_owned()
    }

    fn from_bytes(bytes: Cow<'_, [u8]>) -> Self {
        serde_json::from_slice(&bytes).expect(
            "CRITICAL: Failed to decode PlayerTotals from stable storage."
        )
    }

    const BOUND: Bound = Bound::Unbounded;
}

/// Aggregate statistics for queries
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct PlayerStats {
    pub games_played: u64,
    pub deals_accepted: u64,
    /// Max net gain over all games, floored at 0 (decimals)
    pub highest_net_gain: i64,
    /// Mean net gain per game (decimals)
    pub average_net_gain: f64,
}

impl From<&PlayerTotals> for PlayerStats {
    fn from(totals: &PlayerTotals) -> Self {
        let average_net_gain = if totals.games_played == 0 {
            0.0
        } else {
            totals.total_net_gain as f64 / totals.games_played as f64
        };
        Self {
            games_played: totals.games_played,
            deals_accepted: totals.deals_accepted,
            highest_net_gain: totals.highest_net_gain,
            average_net_gain,
        }
    }
}

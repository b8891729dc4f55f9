use candid::{CandidType, Deserialize};
use ic_stable_structures::storable::Bound;
use ic_stable_structures::Storable;
use serde::Serialize;
use std::borrow::Cow;

use crate::offer;
use crate::rounds::{self, MAX_ROUND};
use crate::values;

// =============================================================================
// CONSTANTS
// =============================================================================

pub const DECIMALS_PER_UNIT: u64 = 1_000_000; // 1 unit = 1,000,000 decimals (6 decimals)
pub const CENT: u64 = DECIMALS_PER_UNIT / 100;
pub const CASE_COUNT: usize = 26;
pub const MIN_STAKE: u64 = 50 * DECIMALS_PER_UNIT;
pub const MAX_STAKE: u64 = 1_000 * DECIMALS_PER_UNIT;

/// Whole display units expressed in decimals.
pub const fn units(amount: u64) -> u64 {
    amount * DECIMALS_PER_UNIT
}

pub fn to_display_units(decimals: u64) -> f64 {
    decimals as f64 / DECIMALS_PER_UNIT as f64
}

// =============================================================================
// CORE STATE
// =============================================================================

#[derive(CandidType, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum GamePhase {
    AwaitingStake,
    AwaitingPlayerCase,
    SelectingCases,
    OfferPresented,
    Finished,
}

impl GamePhase {
    /// Position along the forward path of a game.
    pub fn ordinal(&self) -> u8 {
        match self {
            GamePhase::AwaitingStake => 0,
            GamePhase::AwaitingPlayerCase => 1,
            GamePhase::SelectingCases => 2,
            GamePhase::OfferPresented => 3,
            GamePhase::Finished => 4,
        }
    }
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Case {
    pub id: u8,
    pub value: u64, // decimals
    pub is_opened: bool,
    pub is_player_case: bool,
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct GameSession {
    pub cases: Vec<Case>,
    pub player_case_id: Option<u8>,
    pub current_round: u8,
    pub cases_opened_this_round: u8,
    pub phase: GamePhase,
    pub banker_offer: Option<u64>,
    pub deal_accepted: bool,
    pub accepted_offer: Option<u64>,
    pub stake: Option<u64>,
    pub randomness_hash: Option<String>,
    pub is_offer_visible: bool,
    pub is_outcome_visible: bool,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    pub fn new() -> Self {
        Self {
            cases: Vec::new(),
            player_case_id: None,
            current_round: 0,
            cases_opened_this_round: 0,
            phase: GamePhase::AwaitingStake,
            banker_offer: None,
            deal_accepted: false,
            accepted_offer: None,
            stake: None,
            randomness_hash: None,
            is_offer_visible: false,
            is_outcome_visible: false,
        }
    }

    pub fn case(&self, case_id: u8) -> Option<&Case> {
        self.cases.iter().find(|c| c.id == case_id)
    }

    pub fn case_mut(&mut self, case_id: u8) -> Option<&mut Case> {
        self.cases.iter_mut().find(|c| c.id == case_id)
    }

    pub fn player_case(&self) -> Option<&Case> {
        self.cases.iter().find(|c| c.is_player_case)
    }

    /// Unopened cases the player may still eliminate.
    pub fn openable_count(&self) -> usize {
        self.cases
            .iter()
            .filter(|c| !c.is_opened && !c.is_player_case)
            .count()
    }

    pub fn opened_count(&self) -> usize {
        self.cases.iter().filter(|c| c.is_opened).count()
    }

    /// Values still in play from the banker's side, the player's case included.
    pub fn remaining_values(&self) -> Vec<u64> {
        self.cases
            .iter()
            .filter(|c| !c.is_opened)
            .map(|c| c.value)
            .collect()
    }

    pub fn is_finished(&self) -> bool {
        self.phase == GamePhase::Finished
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        if !self.is_finished() {
            return None;
        }
        let player_case_value = self.player_case()?.value;
        let (winnings, net_gain) = match (self.deal_accepted, self.accepted_offer) {
            (true, Some(offer)) => (offer, offer as i64 - player_case_value as i64),
            _ => (player_case_value, 0),
        };
        Some(GameOutcome {
            player_case_value,
            accepted_offer: self.accepted_offer,
            cases_opened: self.opened_count() as u8,
            deal_accepted: self.deal_accepted,
            winnings,
            net_gain,
        })
    }

    /// Structural checks over a session, used for imported snapshots and tests.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.phase == GamePhase::AwaitingStake {
            if !self.cases.is_empty() || self.player_case_id.is_some() || self.current_round != 0 {
                return Err("Session awaiting stake must be empty".to_string());
            }
            return Ok(());
        }

        if self.cases.len() != CASE_COUNT {
            return Err(format!("Expected {} cases, found {}", CASE_COUNT, self.cases.len()));
        }
        for (index, case) in self.cases.iter().enumerate() {
            if case.id as usize != index + 1 {
                return Err(format!("Case ids must be contiguous: position {} holds {}", index, case.id));
            }
        }

        let stake = self.stake.ok_or("Started session without a stake")?;
        let mut actual: Vec<u64> = self.cases.iter().map(|c| c.value).collect();
        actual.sort_unstable();
        if actual.windows(2).any(|w| w[0] == w[1]) {
            return Err("Case values must be distinct".to_string());
        }
        if actual != values::scaled_values(stake).to_vec() {
            return Err("Case values are not the scaled value table".to_string());
        }

        let player_cases: Vec<&Case> = self.cases.iter().filter(|c| c.is_player_case).collect();
        if player_cases.len() > 1 {
            return Err("More than one player case".to_string());
        }
        if let Some(case) = player_cases.first() {
            if case.is_opened {
                return Err(format!("Player case {} was opened", case.id));
            }
            if self.player_case_id != Some(case.id) {
                return Err("Player case flag and player_case_id disagree".to_string());
            }
        } else if self.player_case_id.is_some() {
            return Err("player_case_id set without a flagged case".to_string());
        }

        match self.phase {
            GamePhase::AwaitingPlayerCase => {
                if self.player_case_id.is_some() || self.opened_count() > 0 || self.current_round != 0 {
                    return Err("Session awaiting player case has progressed".to_string());
                }
            }
            _ => {
                if self.player_case_id.is_none() {
                    return Err("Game in play without a player case".to_string());
                }
                if self.current_round == 0 || self.current_round > MAX_ROUND {
                    return Err(format!("Round {} outside 1..={}", self.current_round, MAX_ROUND));
                }
                let quota = rounds::cases_to_open(self.current_round);
                if self.cases_opened_this_round > quota {
                    return Err(format!(
                        "Opened {} cases in round {} with quota {}",
                        self.cases_opened_this_round, self.current_round, quota
                    ));
                }
                self.check_round_progress(quota)?;
            }
        }

        if self.deal_accepted != self.accepted_offer.is_some() {
            return Err("Deal flag and accepted offer disagree".to_string());
        }
        if self.deal_accepted && self.phase != GamePhase::Finished {
            return Err("Deal accepted but game not finished".to_string());
        }

        // The live offer, and an accepted one, must be what the banker computes
        // for the cases still closed in this round.
        let offer_in_force = match self.phase {
            GamePhase::OfferPresented => {
                Some(self.banker_offer.ok_or("Offer presented without a banker offer")?)
            }
            _ => self.accepted_offer,
        };
        if let Some(amount) = offer_in_force {
            let expected = offer::calculate_offer(&self.remaining_values(), self.current_round);
            if amount != expected {
                return Err(format!(
                    "Banker offer {} does not match {} for round {}",
                    amount, expected, self.current_round
                ));
            }
            if self.accepted_offer.is_some() && self.banker_offer != self.accepted_offer {
                return Err("Accepted offer differs from the banker offer".to_string());
            }
        }

        Ok(())
    }

    /// Opened cases must add up with the schedule: every finished round
    /// opened between one case and its quota, the current round holds the rest.
    fn check_round_progress(&self, quota: u8) -> Result<(), String> {
        let opened = self.opened_count();
        let this_round = self.cases_opened_this_round as usize;
        let past_rounds = 1..self.current_round;
        let min_opened = this_round + past_rounds.len();
        let max_opened = this_round
            + past_rounds
                .map(|r| rounds::cases_to_open(r) as usize)
                .sum::<usize>();
        if opened < min_opened || opened > max_opened {
            return Err(format!(
                "{} cases opened by round {} (counter {}), expected {}..={}",
                opened, self.current_round, this_round, min_opened, max_opened
            ));
        }

        match self.phase {
            GamePhase::SelectingCases => {
                if self.cases_opened_this_round >= quota {
                    return Err("Round quota reached without a banker offer".to_string());
                }
                if self.openable_count() == 0 {
                    return Err("Nothing left to open but game not finished".to_string());
                }
            }
            GamePhase::OfferPresented if self.cases_opened_this_round == 0 => {
                return Err("Offer presented before any case was opened this round".to_string());
            }
            _ => {}
        }
        Ok(())
    }
}

impl Storable for GameSession {
    fn to_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Owned(serde_json::to_vec(self).expect(
            "CRITICAL: Failed to encode GameSession."
        ))
    }

    fn into_bytes(self) -> Vec<u8> {
        self.to_bytes().into_owned()
    }

    fn from_bytes(bytes: Cow<'_, [u8]>) -> Self {
        serde_json::from_slice(&bytes).expect(
            "CRITICAL: Failed to decode GameSession from stable storage."
        )
    }

    const BOUND: Bound = Bound::Unbounded;
}

// =============================================================================
// RESULTS & VIEWS
// =============================================================================

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct GameOutcome {
    pub player_case_value: u64,
    pub accepted_offer: Option<u64>,
    pub cases_opened: u8,
    pub deal_accepted: bool,
    pub winnings: u64,
    /// Accepted offer minus case value; 0 when the player kept the case
    pub net_gain: i64,
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct RoundDescriptor {
    pub round: u8,
    pub cases_to_open: u8,
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct BoardEntry {
    pub value: u64,
    pub is_eliminated: bool,
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct CaseView {
    pub id: u8,
    pub value: Option<u64>, // hidden until opened or game over
    pub is_opened: bool,
    pub is_player_case: bool,
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct SessionView {
    pub phase: GamePhase,
    pub cases: Vec<CaseView>,
    pub player_case_id: Option<u8>,
    pub current_round: u8,
    pub cases_to_open_this_round: u8,
    pub cases_opened_this_round: u8,
    pub cases_remaining_to_open: u8,
    pub banker_offer: Option<u64>,
    pub deal_accepted: bool,
    pub accepted_offer: Option<u64>,
    pub stake: Option<u64>,
    pub randomness_hash: Option<String>,
    pub board: Vec<BoardEntry>,
    pub outcome: Option<GameOutcome>,
    pub is_offer_visible: bool,
    pub is_outcome_visible: bool,
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(CandidType, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum ErrorKind {
    InvalidTransition,
    InvalidTarget,
    Unavailable,
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("Cannot {action} while {phase:?}")]
    InvalidTransition { action: String, phase: GamePhase },
    #[error("Open at least one case this round before asking for an offer")]
    NoCasesOpenedThisRound,
    #[error("Case {0} does not exist")]
    CaseNotFound(u8),
    #[error("Case {0} is already opened")]
    CaseAlreadyOpened(u8),
    #[error("Case {0} is your case and stays closed until the end")]
    PlayerCaseNotOpenable(u8),
    #[error("Randomness unavailable: {0}")]
    RandomnessUnavailable(String),
    #[error("Invalid session snapshot: {0}")]
    InvalidSnapshot(String),
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::InvalidTransition { .. } | GameError::NoCasesOpenedThisRound => {
                ErrorKind::InvalidTransition
            }
            GameError::CaseNotFound(_)
            | GameError::CaseAlreadyOpened(_)
            | GameError::PlayerCaseNotOpenable(_)
            | GameError::InvalidSnapshot(_) => ErrorKind::InvalidTarget,
            GameError::RandomnessUnavailable(_) => ErrorKind::Unavailable,
        }
    }

    pub(crate) fn invalid_transition(action: &str, phase: GamePhase) -> Self {
        GameError::InvalidTransition {
            action: action.to_string(),
            phase,
        }
    }
}

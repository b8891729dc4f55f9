use crate::offer;
use crate::randomness;
use crate::rounds::{self, MAX_ROUND};
use crate::types::*;
use crate::values;

// =============================================================================
// ACTIONS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameAction {
    /// Stake plus the 32-byte seed that shuffles the cases
    SetStake { amount: u64, seed: [u8; 32] },
    SelectPlayerCase(u8),
    OpenCase(u8),
    RequestOfferEarly,
    AcceptDeal,
    RejectDeal,
    Reset,
}

impl GameAction {
    fn describe(&self) -> &'static str {
        match self {
            GameAction::SetStake { .. } => "set the stake",
            GameAction::SelectPlayerCase(_) => "select your case",
            GameAction::OpenCase(_) => "open a case",
            GameAction::RequestOfferEarly => "request an offer",
            GameAction::AcceptDeal => "accept the deal",
            GameAction::RejectDeal => "reject the deal",
            GameAction::Reset => "reset",
        }
    }
}

// =============================================================================
// REDUCER
// =============================================================================

/// Apply one action to a session, returning the next session.
///
/// The input is never modified; on error the caller keeps what it had.
pub fn reduce(session: &GameSession, action: &GameAction) -> Result<GameSession, GameError> {
    let guard = |expected: GamePhase| -> Result<(), GameError> {
        if session.phase == expected {
            Ok(())
        } else {
            Err(GameError::invalid_transition(action.describe(), session.phase))
        }
    };

    match action {
        GameAction::Reset => Ok(GameSession::new()),

        GameAction::SetStake { amount, seed } => {
            guard(GamePhase::AwaitingStake)?;
            let stake = values::clamp_stake(*amount);
            let mut next = GameSession::new();
            next.cases = values::generate_cases(stake, *seed);
            next.stake = Some(stake);
            next.randomness_hash = Some(randomness::randomness_hash(seed));
            next.phase = GamePhase::AwaitingPlayerCase;
            Ok(next)
        }

        GameAction::SelectPlayerCase(case_id) => {
            guard(GamePhase::AwaitingPlayerCase)?;
            let case = session.case(*case_id).ok_or(GameError::CaseNotFound(*case_id))?;
            if case.is_opened {
                return Err(GameError::CaseAlreadyOpened(*case_id));
            }

            let mut next = session.clone();
            if let Some(case) = next.case_mut(*case_id) {
                case.is_player_case = true;
            }
            next.player_case_id = Some(*case_id);
            next.current_round = 1;
            next.cases_opened_this_round = 0;
            next.phase = GamePhase::SelectingCases;
            auto_finish(&mut next);
            Ok(next)
        }

        GameAction::OpenCase(case_id) => {
            guard(GamePhase::SelectingCases)?;
            let case = session.case(*case_id).ok_or(GameError::CaseNotFound(*case_id))?;
            if case.is_player_case {
                return Err(GameError::PlayerCaseNotOpenable(*case_id));
            }
            if case.is_opened {
                return Err(GameError::CaseAlreadyOpened(*case_id));
            }

            let mut next = session.clone();
            if let Some(case) = next.case_mut(*case_id) {
                case.is_opened = true;
            }
            next.cases_opened_this_round += 1;

            if next.cases_opened_this_round >= rounds::cases_to_open(next.current_round) {
                present_offer(&mut next);
            } else {
                auto_finish(&mut next);
            }
            Ok(next)
        }

        GameAction::RequestOfferEarly => {
            guard(GamePhase::SelectingCases)?;
            if session.cases_opened_this_round == 0 {
                return Err(GameError::NoCasesOpenedThisRound);
            }
            let mut next = session.clone();
            present_offer(&mut next);
            Ok(next)
        }

        GameAction::AcceptDeal => {
            guard(GamePhase::OfferPresented)?;
            let mut next = session.clone();
            next.accepted_offer = next.banker_offer;
            next.deal_accepted = next.accepted_offer.is_some();
            finish(&mut next);
            Ok(next)
        }

        GameAction::RejectDeal => {
            guard(GamePhase::OfferPresented)?;
            let mut next = session.clone();
            next.is_offer_visible = false;
            if next.current_round >= MAX_ROUND {
                finish(&mut next);
            } else {
                next.current_round += 1;
                next.cases_opened_this_round = 0;
                next.phase = GamePhase::SelectingCases;
                auto_finish(&mut next);
            }
            Ok(next)
        }
    }
}

fn present_offer(session: &mut GameSession) {
    let remaining = session.remaining_values();
    session.banker_offer = Some(offer::calculate_offer(&remaining, session.current_round));
    session.phase = GamePhase::OfferPresented;
    session.is_offer_visible = true;
}

fn finish(session: &mut GameSession) {
    session.phase = GamePhase::Finished;
    session.is_offer_visible = false;
    session.is_outcome_visible = true;
}

/// Ends the game once nothing is left to open but the player's own case.
fn auto_finish(session: &mut GameSession) {
    if session.phase == GamePhase::SelectingCases
        && !session.deal_accepted
        && session.openable_count() == 0
    {
        finish(session);
    }
}

// =============================================================================
// VIEWS
// =============================================================================

/// What a client may see of a session. Case values stay hidden until the case
/// is opened or the game is over.
pub fn session_view(session: &GameSession) -> SessionView {
    let finished = session.is_finished();
    let cases = session
        .cases
        .iter()
        .map(|c| CaseView {
            id: c.id,
            value: (c.is_opened || finished).then_some(c.value),
            is_opened: c.is_opened,
            is_player_case: c.is_player_case,
        })
        .collect();

    let cases_to_open_this_round = if (1..=MAX_ROUND).contains(&session.current_round) {
        rounds::cases_to_open(session.current_round)
    } else {
        0
    };

    SessionView {
        phase: session.phase,
        cases,
        player_case_id: session.player_case_id,
        current_round: session.current_round,
        cases_to_open_this_round,
        cases_opened_this_round: session.cases_opened_this_round,
        cases_remaining_to_open: cases_to_open_this_round
            .saturating_sub(session.cases_opened_this_round),
        banker_offer: session.banker_offer,
        deal_accepted: session.deal_accepted,
        accepted_offer: session.accepted_offer,
        stake: session.stake,
        randomness_hash: session.randomness_hash.clone(),
        board: values::value_board(session),
        outcome: session.outcome(),
        is_offer_visible: session.is_offer_visible,
        is_outcome_visible: session.is_outcome_visible,
    }
}

use proptest::prelude::*;
use super::generators::{action_sequence, case_id, stake_amount};
use crate::game::{reduce, session_view, GameAction};
use crate::offer;
use crate::rounds::{self, MAX_ROUND};
use crate::types::*;
use crate::values;

/// Checks every step of a transition that the invariants alone cannot see.
fn check_step(before: &GameSession, action: &GameAction, after: &GameSession) -> Result<(), String> {
    after.check_invariants()?;

    let cycle_back = before.phase == GamePhase::OfferPresented
        && after.phase == GamePhase::SelectingCases;
    if *action != GameAction::Reset
        && !cycle_back
        && after.phase.ordinal() < before.phase.ordinal()
    {
        return Err(format!("Phase moved back {:?} -> {:?}", before.phase, after.phase));
    }

    if after.current_round == before.current_round + 1 && after.cases_opened_this_round != 0 {
        return Err("Round advanced without resetting the counter".to_string());
    }
    if after.current_round == before.current_round
        && after.cases_opened_this_round < before.cases_opened_this_round
    {
        return Err("Counter reset without a round advance".to_string());
    }

    if let Some(offer) = after.banker_offer {
        if after.phase == GamePhase::OfferPresented {
            let mean = offer::expected_value(&after.remaining_values());
            if offer > mean {
                return Err(format!("Offer {} above expected value {}", offer, mean));
            }
        }
    }

    if after.is_finished() && after.outcome().is_none() {
        return Err("Finished session without an outcome".to_string());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn test_invariants_hold_after_every_action(actions in action_sequence(120)) {
        let mut session = GameSession::new();

        for (i, action) in actions.into_iter().enumerate() {
            match reduce(&session, &action) {
                Ok(next) => {
                    check_step(&session, &action, &next)
                        .map_err(|e| TestCaseError::fail(format!("Op {} {:?}: {}", i, action, e)))?;
                    session = next;
                }
                Err(e) => {
                    // Rejected actions carry a kind and never touch the input
                    prop_assert!(e.kind() != ErrorKind::Unavailable);
                    session.check_invariants().map_err(TestCaseError::fail)?;
                }
            }
        }
    }

    #[test]
    fn test_rejected_action_returns_identical_session(
        actions in action_sequence(40),
        target in case_id(),
    ) {
        let mut session = GameSession::new();
        for action in actions {
            if let Ok(next) = reduce(&session, &action) {
                session = next;
            }
        }

        let snapshot = session.clone();
        for action in [
            GameAction::SelectPlayerCase(target),
            GameAction::OpenCase(target),
            GameAction::RequestOfferEarly,
            GameAction::AcceptDeal,
            GameAction::RejectDeal,
        ] {
            let _ = reduce(&session, &action);
            prop_assert_eq!(&session, &snapshot);
        }
    }

    #[test]
    fn test_dealt_cases_are_a_permutation(amount in stake_amount(), seed in any::<[u8; 32]>()) {
        let session = reduce(&GameSession::new(), &GameAction::SetStake { amount, seed }).unwrap();
        let mut dealt: Vec<u64> = session.cases.iter().map(|c| c.value).collect();
        dealt.sort_unstable();
        prop_assert_eq!(dealt, values::scaled_values(amount).to_vec());
        prop_assert_eq!(session.stake, Some(values::clamp_stake(amount)));
    }

    #[test]
    fn test_every_game_terminates_within_schedule(
        amount in stake_amount(),
        seed in any::<[u8; 32]>(),
        player_case in 1..=26u8,
    ) {
        let mut session = reduce(&GameSession::new(), &GameAction::SetStake { amount, seed }).unwrap();
        session = reduce(&session, &GameAction::SelectPlayerCase(player_case)).unwrap();

        let mut steps = 0;
        while !session.is_finished() {
            let action = match session.phase {
                GamePhase::SelectingCases => {
                    let id = session
                        .cases
                        .iter()
                        .find(|c| !c.is_opened && !c.is_player_case)
                        .map(|c| c.id)
                        .unwrap();
                    GameAction::OpenCase(id)
                }
                _ => GameAction::RejectDeal,
            };
            session = reduce(&session, &action).unwrap();
            steps += 1;
            prop_assert!(steps <= CASE_COUNT + MAX_ROUND as usize);
        }

        prop_assert_eq!(session.current_round, MAX_ROUND);
        prop_assert_eq!(session.opened_count(), CASE_COUNT - 1);
        prop_assert!(!session.player_case().unwrap().is_opened);
    }

    #[test]
    fn test_view_never_leaks_closed_values(actions in action_sequence(60)) {
        let mut session = GameSession::new();
        for action in actions {
            if let Ok(next) = reduce(&session, &action) {
                session = next;
            }
            let view = session_view(&session);
            for (case, shown) in session.cases.iter().zip(view.cases.iter()) {
                let visible = case.is_opened || session.is_finished();
                prop_assert_eq!(shown.value.is_some(), visible);
            }
            if (1..=MAX_ROUND).contains(&session.current_round) {
                prop_assert_eq!(
                    view.cases_to_open_this_round,
                    rounds::cases_to_open(session.current_round)
                );
            }
        }
    }
}

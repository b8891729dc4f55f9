use candid::Principal;
use super::storage::{GAME_RECORDS, PLAYER_TOTALS};
use super::types::GameRecord;
use crate::types::GameOutcome;

/// Append a finished game to the log and fold it into the player's totals.
///
/// Returns the new record's game id.
pub fn record_game(player: Principal, outcome: &GameOutcome, completed_at: u64) -> Result<u64, String> {
    if outcome.deal_accepted != outcome.accepted_offer.is_some() {
        return Err("Deal flag and accepted offer disagree".to_string());
    }
    if outcome.player_case_value == 0 {
        return Err("Player case value must be positive".to_string());
    }

    let game_id = GAME_RECORDS.with(|records| records.borrow().len());
    let record = GameRecord {
        game_id,
        player,
        player_case_value: outcome.player_case_value,
        accepted_offer: outcome.accepted_offer,
        cases_opened: outcome.cases_opened,
        deal_accepted: outcome.deal_accepted,
        completed_at,
    };

    GAME_RECORDS.with(|records| {
        records.borrow_mut().push(&record);
    });

    let net_gain = record.net_gain();
    PLAYER_TOTALS.with(|totals| {
        let mut totals = totals.borrow_mut();
        let mut entry = totals.get(&player).unwrap_or_default();
        entry.games_played += 1;
        if record.deal_accepted {
            entry.deals_accepted += 1;
        }
        entry.highest_net_gain = entry.highest_net_gain.max(net_gain);
        entry.total_net_gain = entry.total_net_gain.saturating_add(net_gain);
        entry.remember_game(game_id);
        totals.insert(player, entry);
    });

    Ok(game_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{get_player_stats, get_total_games};

    fn outcome(accepted_offer: Option<u64>, player_case_value: u64) -> GameOutcome {
        GameOutcome {
            player_case_value,
            accepted_offer,
            cases_opened: 11,
            deal_accepted: accepted_offer.is_some(),
            winnings: accepted_offer.unwrap_or(player_case_value),
            net_gain: 0,
        }
    }

    #[test]
    fn test_record_game_assigns_sequential_ids() {
        let alice = Principal::from_slice(&[1; 29]);
        assert_eq!(record_game(alice, &outcome(None, 500), 1), Ok(0));
        assert_eq!(record_game(alice, &outcome(Some(700), 500), 2), Ok(1));
        assert_eq!(get_total_games(), 2);
    }

    #[test]
    fn test_totals_follow_net_gain_rules() {
        let bob = Principal::from_slice(&[2; 29]);
        record_game(bob, &outcome(Some(4_200), 1_000), 1).unwrap();
        record_game(bob, &outcome(Some(100), 2_500), 2).unwrap();
        record_game(bob, &outcome(None, 2_500), 3).unwrap();

        let stats = get_player_stats(bob);
        assert_eq!(stats.games_played, 3);
        assert_eq!(stats.deals_accepted, 2);
        assert_eq!(stats.highest_net_gain, 3_200);
        // (3200 - 2400 + 0) / 3
        assert!((stats.average_net_gain - 800.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_highest_gain_floors_at_zero() {
        let carol = Principal::from_slice(&[3; 29]);
        record_game(carol, &outcome(Some(10), 5_000), 1).unwrap();
        let stats = get_player_stats(carol);
        assert_eq!(stats.highest_net_gain, 0);
        assert_eq!(stats.average_net_gain, -4_990.0);
    }

    #[test]
    fn test_inconsistent_outcome_is_rejected() {
        let dave = Principal::from_slice(&[4; 29]);
        let mut bad = outcome(Some(10), 5_000);
        bad.deal_accepted = false;
        assert!(record_game(dave, &bad, 1).is_err());
        assert!(record_game(dave, &outcome(None, 0), 1).is_err());
        assert_eq!(get_total_games(), 0);
        assert_eq!(get_player_stats(dave).games_played, 0);
    }
}

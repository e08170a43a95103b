use super::*;
use super::power_up::power_up;

fn roll(state: &mut GameState, die: u8) -> MoveRecord {
    state.begin_roll().unwrap();
    let record = state.commit_roll(die);
    state.advance();
    record
}

fn play_seeded(rules: Rules, seed: u64) -> GameState {
    let mut random = SeededRandom::new(seed);
    let mut state = GameState::new(rules);

    while !state.is_game_over() && state.rolls_count() < MAX_ROLLS {
        if state.offer_pending() {
            state.activate_power_up(random.select_power_up()).unwrap();
            continue;
        }
        state.begin_roll().unwrap();
        state.commit_roll(random.roll_die());
        state.advance();
    }

    state
}

#[test]
fn test_seeded_game_invariants() {
    for seed in 0..25 {
        let state = play_seeded(Rules::twist(), seed);
        let history = state.history();

        assert_eq!(history.len() as u32, state.rolls_count());

        // Turns strictly alternate, starting with player 1
        for (i, record) in history.iter().enumerate() {
            let expected = if i % 2 == 0 {
                PlayerId::One
            } else {
                PlayerId::Two
            };
            assert_eq!(record.player, expected, "seed {seed} roll {}", i + 1);
            assert_eq!(record.roll as usize, i + 1);
            assert!((1..=6).contains(&record.die_value));
            assert!((1..=100).contains(&record.to_tile));
        }

        // Each player's moves chain from where their last one ended
        for player in [PlayerId::One, PlayerId::Two] {
            let mut position = START_TILE;
            for record in history.iter().filter(|r| r.player == player) {
                assert_eq!(record.from_tile, position);
                position = record.to_tile;
            }
            assert_eq!(state.position(player), position);
        }

        // Stats are exactly the redirect counts in the history
        for player in [PlayerId::One, PlayerId::Two] {
            let mine = || history.iter().filter(move |r| r.player == player);
            let bites = mine().filter(|r| r.event_kind == EventKind::Snake).count() as u32;
            let climbs = mine()
                .filter(|r| {
                    matches!(
                        r.event_kind,
                        EventKind::Ladder | EventKind::ReverseLadder
                    )
                })
                .count() as u32;
            assert_eq!(*state.stats().snake_bites.get(player), bites);
            assert_eq!(*state.stats().ladders_climbed.get(player), climbs);
        }

        if let Some(winner) = state.winner() {
            assert_eq!(state.position(winner), FINAL_TILE);
            assert_eq!(history.last().unwrap().event_kind, EventKind::Win);
            assert_eq!(history.last().unwrap().player, winner);
            assert!(history[..history.len() - 1]
                .iter()
                .all(|r| r.event_kind != EventKind::Win));
        }
    }
}

#[test]
fn test_power_ups_used_match_offers_answered() {
    for seed in 0..10 {
        let state = play_seeded(Rules::twist(), seed);
        let used = state.stats().powerups_used;
        let applied = state
            .history()
            .iter()
            .filter(|r| r.power_up.is_some())
            .count() as u32;

        // Every activation is consumed by the owner's next roll, unless the
        // game ended first
        assert!(used.one + used.two >= applied);
        assert!(used.one + used.two <= applied + 1);
    }
}

#[test]
fn test_classic_game_never_uses_power_ups() {
    for seed in 0..10 {
        let state = play_seeded(Rules::classic(), seed);
        assert_eq!(state.stats().powerups_used, PerPlayer::default());
        assert!(state.history().iter().all(|r| r.power_up.is_none()));
        assert!(
            state
                .history()
                .iter()
                .all(|r| r.event_kind != EventKind::ReverseLadder)
        );
    }
}

#[test]
fn test_ghost_mode_passes_over_snake() {
    let mut state = GameState::new(Rules::twist());

    // P1 4, P2 4, P1 7 -> 14, P2 7 -> 14, P1 17
    for _ in 0..5 {
        roll(&mut state, 3);
    }
    assert!(state.offer_pending());
    state
        .activate_power_up(power_up(PowerUpId::GhostMode))
        .unwrap();

    // P2: 14 + 2 = 16, the snake head, but the ghost slips by
    let record = roll(&mut state, 2);
    assert_eq!(record.player, PlayerId::Two);
    assert_eq!(record.to_tile, 16);
    assert_eq!(record.event_kind, EventKind::Move);
    assert_eq!(record.power_up, Some(PowerUpId::GhostMode));
    assert_eq!(state.stats().snake_bites, PerPlayer::default());

    // P1 17 + 1 = 18, then P2 16 + 3 = 19 with nothing armed
    roll(&mut state, 1);
    let record = roll(&mut state, 3);
    assert_eq!(record.to_tile, 19);
    assert!(state.active_power_up().is_none());
}

#[test]
fn test_reverse_ladder_slides_down_and_counts_as_ladder() {
    // A single ladder from 6 up to 9
    let board = Board::new([], [(6, 9)]).unwrap();
    let mut state = GameState::new(Rules::twist().with_board(board));

    // P1 2, P2 2, P1 3, P2 3, P1 4
    for _ in 0..5 {
        roll(&mut state, 1);
    }
    state
        .activate_power_up(power_up(PowerUpId::ReverseLadder))
        .unwrap();

    // P2: 3 + 6 = 9, the top of the ladder, so back down to 6
    let record = roll(&mut state, 6);
    assert_eq!(record.event_kind, EventKind::ReverseLadder);
    assert_eq!(record.via_tile, Some(9));
    assert_eq!(record.to_tile, 6);
    assert_eq!(state.position(PlayerId::Two), 6);
    assert_eq!(state.stats().ladders_climbed, PerPlayer { one: 0, two: 1 });
    assert_eq!(
        record.describe(),
        "Player 2 used Reverse Ladder! Slides down to 6"
    );
}

#[test]
fn test_offers_alternate_between_players() {
    let board = Board::new([], []).unwrap();
    let mut state = GameState::new(Rules::twist().with_board(board));

    // An odd interval hands roll 5's offer to player 2 and roll 10's to player 1
    for _ in 0..10 {
        roll(&mut state, 6);
        if state.offer_pending() {
            state
                .activate_power_up(power_up(PowerUpId::TrapTile))
                .unwrap();
        }
    }
    // Five sixes each, and a trap tile changes nothing
    assert_eq!(state.positions(), PerPlayer { one: 31, two: 31 });

    assert_eq!(state.stats().powerups_used, PerPlayer { one: 1, two: 1 });
    assert_eq!(state.active_power_up().map(|a| a.owner), Some(PlayerId::One));
}

#[test]
fn test_power_up_only_applies_to_owner() {
    let mut state = GameState::new(Rules::twist());
    for _ in 0..5 {
        roll(&mut state, 3);
    }
    // Offer goes to player 2
    state
        .activate_power_up(power_up(PowerUpId::DoubleDice))
        .unwrap();
    assert_eq!(
        state.active_power_up().map(|a| a.owner),
        Some(PlayerId::Two)
    );

    let record = roll(&mut state, 1);
    assert_eq!(record.player, PlayerId::Two);
    assert_eq!(record.effective_roll, 2);

    let record = roll(&mut state, 1);
    assert_eq!(record.player, PlayerId::One);
    assert_eq!(record.effective_roll, 1);
    assert_eq!(record.power_up, None);
}

#[test]
fn test_offer_cadence_follows_roll_count() {
    let mut state = GameState::new(Rules::twist());
    let mut offered_at = Vec::new();

    for _ in 0..30 {
        state.begin_roll().unwrap();
        state.commit_roll(1);
        if state.advance() {
            offered_at.push(state.rolls_count());
            state
                .activate_power_up(power_up(PowerUpId::MysteryPowerup))
                .unwrap();
        }
    }

    assert_eq!(offered_at, vec![5, 10, 15, 20, 25, 30]);
}

#[test]
fn test_custom_interval() {
    let rules = Rules {
        power_up_interval: 3,
        ..Rules::twist()
    };
    let mut state = GameState::new(rules);

    roll(&mut state, 1);
    roll(&mut state, 1);
    assert!(!state.offer_pending());
    roll(&mut state, 1);
    assert!(state.offer_pending());
}

#[test]
fn test_zero_interval_disables_offers() {
    let rules = Rules {
        power_up_interval: 0,
        ..Rules::twist()
    };
    let mut state = GameState::new(rules);
    for _ in 0..12 {
        roll(&mut state, 1);
        assert!(!state.offer_pending());
    }
}

#[test]
fn test_snapshot_is_detached() {
    let mut state = GameState::default();
    let before = state.snapshot();

    roll(&mut state, 4);

    assert_eq!(before.rolls_count, 0);
    assert!(before.history.is_empty());
    assert_eq!(state.snapshot().rolls_count, 1);
    assert_eq!(state.snapshot().last_die, Some(4));
}

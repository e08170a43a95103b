//! Turns a die roll into a destination tile.
//!
//! Resolution is a pure function of the starting tile, the die, the active
//! power-up and the board. Precedence, first match wins:
//!
//! 1. reaching or passing the final tile wins (overshoot is clamped)
//! 2. a snake head sends the piece to its tail, unless Ghost Mode is active
//! 3. a ladder base sends the piece to its top
//! 4. with Reverse Ladder active, a ladder top sends the piece to its base
//! 5. otherwise the piece stays where it landed

use serde::{Deserialize, Serialize};

use super::board::{Board, FINAL_TILE, RedirectionKind, START_TILE};
use super::dice::DIE_FACES;
use super::power_up::{EffectTag, PowerUp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Move,
    Snake,
    Ladder,
    ReverseLadder,
    Win,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Move => "move",
            EventKind::Snake => "snake",
            EventKind::Ladder => "ladder",
            EventKind::ReverseLadder => "reverse-ladder",
            EventKind::Win => "win",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMove {
    pub to_tile: u8,
    pub event_kind: EventKind,
    /// Tile landed on before a redirection; set for Snake, Ladder and ReverseLadder only
    pub via_tile: Option<u8>,
    pub effective_roll: u8,
}

/// Resolve one roll.
///
/// # Panics
///
/// If `from_tile` is outside `1..=99` or `die_value` outside `1..=6`. Both
/// mean the caller is broken: a piece on the final tile never rolls again.
pub fn resolve_move(
    from_tile: u8,
    die_value: u8,
    active_power_up: Option<&PowerUp>,
    board: &Board,
) -> ResolvedMove {
    assert!(
        (START_TILE..FINAL_TILE).contains(&from_tile),
        "resolve_move called from tile {from_tile}"
    );
    assert!(
        (1..=DIE_FACES).contains(&die_value),
        "resolve_move called with die value {die_value}"
    );

    let effect = active_power_up
        .map(|p| p.effect)
        .unwrap_or(EffectTag::NoRuleEffect);

    let effective_roll = match effect {
        EffectTag::DoublesRoll => die_value * 2,
        _ => die_value,
    };

    let candidate = from_tile + effective_roll;

    if candidate >= FINAL_TILE {
        return ResolvedMove {
            to_tile: FINAL_TILE,
            event_kind: EventKind::Win,
            via_tile: None,
            effective_roll,
        };
    }

    let redirected = |to_tile, event_kind| ResolvedMove {
        to_tile,
        event_kind,
        via_tile: Some(candidate),
        effective_roll,
    };

    let redirection = board.redirection_for(candidate);
    match redirection.kind {
        RedirectionKind::Snake if effect != EffectTag::IgnoresSnakes => {
            return redirected(redirection.destination, EventKind::Snake);
        }
        RedirectionKind::Ladder => {
            return redirected(redirection.destination, EventKind::Ladder);
        }
        _ => {}
    }

    if effect == EffectTag::ReversesLadders
        && let Some(base) = board.ladder_base_for_top(candidate)
    {
        return redirected(base, EventKind::ReverseLadder);
    }

    ResolvedMove {
        to_tile: candidate,
        event_kind: EventKind::Move,
        via_tile: None,
        effective_roll,
    }
}

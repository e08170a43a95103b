//! Render frames for external board viewers
//!
//! A frame flattens a snapshot into what a renderer draws each tick: piece
//! positions, the last move, the status line and the stats panel.

use serde::Serialize;

use crate::engine::{FINAL_TILE, GameMode, GameSnapshot, MoveRecord, Phase, PlayerId, Rules};

/// Rough odds label shown next to each player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WinningChance {
    VeryLow,
    Low,
    Medium,
    High,
}

impl WinningChance {
    pub fn for_position(position: u8) -> Self {
        match position {
            90.. => WinningChance::High,
            70..=89 => WinningChance::Medium,
            50..=69 => WinningChance::Low,
            _ => WinningChance::VeryLow,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WinningChance::VeryLow => "Very Low",
            WinningChance::Low => "Low",
            WinningChance::Medium => "Medium",
            WinningChance::High => "High",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionFrame {
    pub mode: GameMode,
    pub rolls: u32,
    pub current_player: u8,
    pub last_die: Option<u8>,
    pub message: String,
    pub players: Vec<FramePlayer>,
    pub last_move: Option<MoveRecord>,
    /// `None` in classic games, `Some(0)` while an offer is waiting
    pub rolls_until_power_up: Option<u32>,
    pub active_power_up: Option<FramePowerUp>,
    pub winner: Option<u8>,
}

#[derive(Debug, Serialize)]
pub struct FramePlayer {
    pub player: u8,
    pub position: u8,
    pub snake_bites: u32,
    pub ladders_climbed: u32,
    pub powerups_used: u32,
    pub winning_chance: WinningChance,
    pub is_current: bool,
}

#[derive(Debug, Serialize)]
pub struct FramePowerUp {
    pub name: &'static str,
    pub emoji: &'static str,
    pub owner: u8,
}

/// Convert a snapshot to a frame for the board viewer
pub fn snapshot_to_frame(snapshot: &GameSnapshot, rules: &Rules) -> SessionFrame {
    let players = [PlayerId::One, PlayerId::Two]
        .into_iter()
        .map(|player| {
            let position = *snapshot.positions.get(player);
            FramePlayer {
                player: player.number(),
                position,
                snake_bites: *snapshot.stats.snake_bites.get(player),
                ladders_climbed: *snapshot.stats.ladders_climbed.get(player),
                powerups_used: *snapshot.stats.powerups_used.get(player),
                winning_chance: WinningChance::for_position(position),
                is_current: snapshot.current_player == player,
            }
        })
        .collect();

    SessionFrame {
        mode: snapshot.mode,
        rolls: snapshot.rolls_count,
        current_player: snapshot.current_player.number(),
        last_die: snapshot.last_die,
        message: status_message(snapshot),
        players,
        last_move: snapshot.last_move().cloned(),
        rolls_until_power_up: rolls_until_power_up(snapshot, rules),
        active_power_up: snapshot.active_power_up.map(|active| FramePowerUp {
            name: active.power_up.display_name,
            emoji: active.power_up.emoji,
            owner: active.owner.number(),
        }),
        winner: snapshot.winner.map(PlayerId::number),
    }
}

fn rolls_until_power_up(snapshot: &GameSnapshot, rules: &Rules) -> Option<u32> {
    if !rules.offers_power_ups() {
        return None;
    }
    if snapshot.pending_offer {
        return Some(0);
    }
    Some(rules.power_up_interval - snapshot.rolls_count % rules.power_up_interval)
}

/// The line shown above the board
pub fn status_message(snapshot: &GameSnapshot) -> String {
    if let Phase::GameOver(winner) = snapshot.phase {
        return format!("🏆 {winner} wins! 🏆");
    }

    if snapshot.pending_offer {
        return format!("🎁 {} spins the power-up wheel!", snapshot.current_player);
    }

    if let Some(active) = snapshot.active_power_up {
        return format!(
            "🎁 {} activated {}! {}",
            active.owner, active.power_up.display_name, active.power_up.emoji
        );
    }

    match snapshot.last_move() {
        Some(record) => record.describe(),
        None => "Roll the dice to start!".to_string(),
    }
}

/// Tiles left to the finish, for progress bars
pub fn tiles_remaining(position: u8) -> u8 {
    FINAL_TILE.saturating_sub(position)
}

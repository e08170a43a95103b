// Game state and turn state machine for Snakes & Ladders

use serde::{Deserialize, Serialize};

use super::board::{FINAL_TILE, START_TILE};
use super::power_up::{PowerUp, PowerUpId};
use super::resolver::{EventKind, resolve_move};
use super::rules::{GameMode, Rules};

// Exactly two seats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub fn other(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            PlayerId::One => 1,
            PlayerId::Two => 2,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(PlayerId::One),
            2 => Some(PlayerId::Two),
            _ => None,
        }
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

/// One value per player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PerPlayer<T> {
    pub one: T,
    pub two: T,
}

impl<T> PerPlayer<T> {
    pub fn both(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            one: value.clone(),
            two: value,
        }
    }

    pub fn get(&self, player: PlayerId) -> &T {
        match player {
            PlayerId::One => &self.one,
            PlayerId::Two => &self.two,
        }
    }

    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        match player {
            PlayerId::One => &mut self.one,
            PlayerId::Two => &mut self.two,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    pub snake_bites: PerPlayer<u32>,
    pub ladders_climbed: PerPlayer<u32>,
    pub powerups_used: PerPlayer<u32>,
}

// A power-up waiting to modify its owner's next move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivePowerUp {
    pub power_up: PowerUp,
    pub owner: PlayerId,
}

/// Audit entry for one resolved roll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// 1-based roll number within the game
    pub roll: u32,
    pub player: PlayerId,
    pub from_tile: u8,
    pub to_tile: u8,
    pub die_value: u8,
    pub effective_roll: u8,
    pub event_kind: EventKind,
    pub via_tile: Option<u8>,
    pub power_up: Option<PowerUpId>,
}

impl MoveRecord {
    /// Player-facing status line for this move
    pub fn describe(&self) -> String {
        let player = self.player;
        match self.event_kind {
            EventKind::Win => format!("{player} wins!"),
            EventKind::Snake => format!(
                "{player} got bitten by a snake! Slides down to {}",
                self.to_tile
            ),
            EventKind::Ladder => {
                format!("{player} climbed a ladder! Jumps up to {}", self.to_tile)
            }
            EventKind::ReverseLadder => format!(
                "{player} used Reverse Ladder! Slides down to {}",
                self.to_tile
            ),
            EventKind::Move => format!("{player} moved to {}", self.to_tile),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    AwaitingRoll(PlayerId),
    Rolling(PlayerId),
    Resolved(PlayerId),
    GameOver(PlayerId),
}

/// Why a request left the state untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IgnoredReason {
    RollInFlight,
    OfferPending,
    GameOver,
    NoOfferPending,
}

impl IgnoredReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            IgnoredReason::RollInFlight => "roll already in flight",
            IgnoredReason::OfferPending => "power-up selection pending",
            IgnoredReason::GameOver => "game is over",
            IgnoredReason::NoOfferPending => "no power-up offer pending",
        }
    }
}

// Complete game state. Fields change only through the transition methods.
#[derive(Debug, Clone)]
pub struct GameState {
    rules: Rules,
    positions: PerPlayer<u8>,
    current_player: PlayerId,
    active_power_up: Option<ActivePowerUp>,
    pending_offer: bool,
    rolls_count: u32,
    stats: Stats,
    history: Vec<MoveRecord>,
    winner: Option<PlayerId>,
    phase: Phase,
    last_die: Option<u8>,
}

impl GameState {
    pub fn new(rules: Rules) -> Self {
        Self {
            rules,
            positions: PerPlayer::both(START_TILE),
            current_player: PlayerId::One,
            active_power_up: None,
            pending_offer: false,
            rolls_count: 0,
            stats: Stats::default(),
            history: Vec::new(),
            winner: None,
            phase: Phase::AwaitingRoll(PlayerId::One),
            last_die: None,
        }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn position(&self, player: PlayerId) -> u8 {
        *self.positions.get(player)
    }

    pub fn positions(&self) -> PerPlayer<u8> {
        self.positions
    }

    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    pub fn active_power_up(&self) -> Option<&ActivePowerUp> {
        self.active_power_up.as_ref()
    }

    pub fn offer_pending(&self) -> bool {
        self.pending_offer
    }

    pub fn rolls_count(&self) -> u32 {
        self.rolls_count
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn last_die(&self) -> Option<u8> {
        self.last_die
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver(_))
    }

    /// AwaitingRoll -> Rolling
    pub fn begin_roll(&mut self) -> Result<PlayerId, IgnoredReason> {
        match self.phase {
            Phase::GameOver(_) => Err(IgnoredReason::GameOver),
            Phase::Rolling(_) | Phase::Resolved(_) => Err(IgnoredReason::RollInFlight),
            Phase::AwaitingRoll(_) if self.pending_offer => Err(IgnoredReason::OfferPending),
            Phase::AwaitingRoll(player) => {
                self.phase = Phase::Rolling(player);
                Ok(player)
            }
        }
    }

    /// Rolling -> Resolved: resolve the die and record the move.
    ///
    /// # Panics
    ///
    /// If no roll is in flight.
    pub fn commit_roll(&mut self, die_value: u8) -> MoveRecord {
        let Phase::Rolling(player) = self.phase else {
            panic!("commit_roll outside of a roll: {:?}", self.phase);
        };

        let from_tile = self.position(player);
        // A power-up only ever modifies its owner's move
        let power_up = self
            .active_power_up
            .filter(|active| active.owner == player)
            .map(|active| active.power_up);

        let resolved = resolve_move(from_tile, die_value, power_up.as_ref(), &self.rules.board);

        match resolved.event_kind {
            EventKind::Snake => *self.stats.snake_bites.get_mut(player) += 1,
            // Sliding down a ladder still counts as using one
            EventKind::Ladder | EventKind::ReverseLadder => {
                *self.stats.ladders_climbed.get_mut(player) += 1
            }
            EventKind::Move | EventKind::Win => {}
        }

        *self.positions.get_mut(player) = resolved.to_tile;
        self.rolls_count += 1;
        self.last_die = Some(die_value);

        let record = MoveRecord {
            roll: self.rolls_count,
            player,
            from_tile,
            to_tile: resolved.to_tile,
            die_value,
            effective_roll: resolved.effective_roll,
            event_kind: resolved.event_kind,
            via_tile: resolved.via_tile,
            power_up: power_up.map(|p| p.id),
        };
        self.history.push(record.clone());
        self.phase = Phase::Resolved(player);

        record
    }

    /// Resolved -> GameOver | AwaitingRoll(other).
    ///
    /// Returns true when this turn raised a power-up offer.
    pub fn advance(&mut self) -> bool {
        let Phase::Resolved(player) = self.phase else {
            return false;
        };

        if self.position(player) == FINAL_TILE {
            self.winner = Some(player);
            self.phase = Phase::GameOver(player);
            return false;
        }

        // Single use, whether or not it changed the outcome
        self.active_power_up = None;
        self.current_player = player.other();
        self.phase = Phase::AwaitingRoll(self.current_player);

        if self.rules.offers_power_ups()
            && self.rolls_count % self.rules.power_up_interval == 0
            && self.active_power_up.is_none()
            && !self.pending_offer
        {
            self.pending_offer = true;
            return true;
        }

        false
    }

    /// Answer a pending offer, arming the power-up for the player about to roll
    pub fn activate_power_up(&mut self, power_up: PowerUp) -> Result<PlayerId, IgnoredReason> {
        if self.is_game_over() {
            return Err(IgnoredReason::GameOver);
        }
        if !self.pending_offer {
            return Err(IgnoredReason::NoOfferPending);
        }

        let owner = self.current_player;
        self.pending_offer = false;
        self.active_power_up = Some(ActivePowerUp { power_up, owner });
        *self.stats.powerups_used.get_mut(owner) += 1;

        Ok(owner)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            mode: self.rules.mode,
            positions: self.positions,
            current_player: self.current_player,
            active_power_up: self.active_power_up,
            pending_offer: self.pending_offer,
            rolls_count: self.rolls_count,
            stats: self.stats,
            history: self.history.clone(),
            winner: self.winner,
            phase: self.phase,
            last_die: self.last_die,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Rules::default())
    }
}

/// Immutable copy of the state handed to observers and renderers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub mode: GameMode,
    pub positions: PerPlayer<u8>,
    pub current_player: PlayerId,
    pub active_power_up: Option<ActivePowerUp>,
    pub pending_offer: bool,
    pub rolls_count: u32,
    pub stats: Stats,
    pub history: Vec<MoveRecord>,
    pub winner: Option<PlayerId>,
    pub phase: Phase,
    pub last_die: Option<u8>,
}

impl GameSnapshot {
    pub fn last_move(&self) -> Option<&MoveRecord> {
        self.history.last()
    }
}

// Snakes & Ladders rule engine
// Board topology, dice, power-ups, move resolution and the turn state machine

pub mod board;
pub mod dice;
pub mod game_state;
pub mod power_up;
pub mod resolver;
pub mod rules;

#[cfg(test)]
mod tests;

pub use board::{Board, FINAL_TILE, Redirection, RedirectionKind, START_TILE};
pub use dice::{RandomSource, ScriptedRandom, SeededRandom, ThreadRandom};
pub use game_state::{
    ActivePowerUp, GameSnapshot, GameState, IgnoredReason, MoveRecord, PerPlayer, Phase,
    PlayerId, Stats,
};
pub use power_up::{CATALOG, EffectTag, PowerUp, PowerUpId};
pub use resolver::{EventKind, ResolvedMove, resolve_move};
pub use rules::{GameMode, Rules};

/// Cap on rolls for unattended games; snakes make unbounded games possible
pub const MAX_ROLLS: u32 = 1_000;

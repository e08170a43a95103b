use thiserror::Error;

use crate::engine::board::{FINAL_TILE, START_TILE};

/// Reasons a custom board topology is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("tile {tile} is outside the redirectable range {min}..={max}", min = START_TILE + 1, max = FINAL_TILE - 1)]
    TileOutOfRange { tile: u8 },
    #[error("snake head {head} must be above its tail {tail}")]
    SnakeNotDescending { head: u8, tail: u8 },
    #[error("ladder base {base} must be below its top {top}")]
    LadderNotAscending { base: u8, top: u8 },
    #[error("tile {tile} is both a snake head and a ladder base")]
    Overlap { tile: u8 },
}

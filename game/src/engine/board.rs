// Board topology for Snakes & Ladders

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::BoardError;

pub const START_TILE: u8 = 1;
pub const FINAL_TILE: u8 = 100;

// What landing on a tile does to a piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RedirectionKind {
    Snake,
    Ladder,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redirection {
    pub kind: RedirectionKind,
    pub destination: u8,
}

// Immutable board: snake head -> tail, ladder base -> top
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    snakes: BTreeMap<u8, u8>,
    ladders: BTreeMap<u8, u8>,
}

impl Board {
    /// Build a board, rejecting topologies that break the redirect rules.
    ///
    /// Every head, tail, base and top must sit in `2..=99` (start and finish
    /// are never redirected), snakes must go down, ladders must go up, and no
    /// tile may be both a snake head and a ladder base.
    pub fn new(
        snakes: impl IntoIterator<Item = (u8, u8)>,
        ladders: impl IntoIterator<Item = (u8, u8)>,
    ) -> Result<Self, BoardError> {
        let snakes: BTreeMap<u8, u8> = snakes.into_iter().collect();
        let ladders: BTreeMap<u8, u8> = ladders.into_iter().collect();

        for (&head, &tail) in &snakes {
            check_redirectable(head)?;
            check_redirectable(tail)?;
            if head <= tail {
                return Err(BoardError::SnakeNotDescending { head, tail });
            }
        }

        for (&base, &top) in &ladders {
            check_redirectable(base)?;
            check_redirectable(top)?;
            if base >= top {
                return Err(BoardError::LadderNotAscending { base, top });
            }
            if snakes.contains_key(&base) {
                return Err(BoardError::Overlap { tile: base });
            }
        }

        Ok(Self { snakes, ladders })
    }

    /// The traditional layout used by both classic and twist games
    pub fn standard() -> Self {
        Self {
            snakes: BTreeMap::from([
                (16, 6),
                (46, 25),
                (49, 11),
                (62, 19),
                (64, 60),
                (74, 53),
                (89, 68),
                (92, 88),
                (95, 75),
                (99, 80),
            ]),
            ladders: BTreeMap::from([
                (2, 38),
                (7, 14),
                (8, 31),
                (15, 26),
                (21, 42),
                (28, 84),
                (36, 44),
                (51, 67),
                (71, 91),
                (78, 98),
            ]),
        }
    }

    pub fn size(&self) -> u8 {
        FINAL_TILE
    }

    pub fn redirection_for(&self, tile: u8) -> Redirection {
        if let Some(&tail) = self.snakes.get(&tile) {
            return Redirection {
                kind: RedirectionKind::Snake,
                destination: tail,
            };
        }

        if let Some(&top) = self.ladders.get(&tile) {
            return Redirection {
                kind: RedirectionKind::Ladder,
                destination: top,
            };
        }

        Redirection {
            kind: RedirectionKind::None,
            destination: tile,
        }
    }

    /// Base of the ladder whose top is `top`, lowest base first if several share it
    pub fn ladder_base_for_top(&self, top: u8) -> Option<u8> {
        // BTreeMap iterates bases in ascending order
        self.ladders
            .iter()
            .find(|&(_, &t)| t == top)
            .map(|(&base, _)| base)
    }

    pub fn snakes(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.snakes.iter().map(|(&h, &t)| (h, t))
    }

    pub fn ladders(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.ladders.iter().map(|(&b, &t)| (b, t))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

fn check_redirectable(tile: u8) -> Result<(), BoardError> {
    if tile <= START_TILE || tile >= FINAL_TILE {
        return Err(BoardError::TileOutOfRange { tile });
    }
    Ok(())
}

// Game rules configuration for Snakes & Ladders

use serde::{Deserialize, Serialize};

use super::board::Board;

pub const DEFAULT_POWER_UP_INTERVAL: u32 = 5;

// Classic games have no power-ups; twist games offer one every few rolls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Classic,
    #[default]
    Twist,
}

impl GameMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(GameMode::Classic),
            "twist" => Some(GameMode::Twist),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Classic => "classic",
            GameMode::Twist => "twist",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rules {
    pub mode: GameMode,
    pub board: Board,
    /// A power-up is offered after every `power_up_interval` completed rolls
    pub power_up_interval: u32,
}

impl Rules {
    pub fn classic() -> Self {
        Self {
            mode: GameMode::Classic,
            ..Self::default()
        }
    }

    pub fn twist() -> Self {
        Self::default()
    }

    pub fn for_mode(mode: GameMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn with_board(mut self, board: Board) -> Self {
        self.board = board;
        self
    }

    pub fn offers_power_ups(&self) -> bool {
        self.mode == GameMode::Twist && self.power_up_interval > 0
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            mode: GameMode::Twist,
            board: Board::standard(),
            power_up_interval: DEFAULT_POWER_UP_INTERVAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_mode_from_str() {
        assert_eq!(GameMode::from_str("classic"), Some(GameMode::Classic));
        assert_eq!(GameMode::from_str("TWIST"), Some(GameMode::Twist));
        assert_eq!(GameMode::from_str("chaos"), None);
    }

    #[test]
    fn test_only_twist_offers_power_ups() {
        assert!(Rules::twist().offers_power_ups());
        assert!(!Rules::classic().offers_power_ups());

        let disabled = Rules {
            power_up_interval: 0,
            ..Rules::twist()
        };
        assert!(!disabled.offers_power_ups());
    }
}

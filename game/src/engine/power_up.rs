// Power-up catalog for twist games

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpId {
    PushAttack,
    DoubleDice,
    GhostMode,
    ReverseLadder,
    TrapTile,
    MysteryPowerup,
}

// How a power-up changes move resolution, if at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectTag {
    DoublesRoll,
    IgnoresSnakes,
    ReversesLadders,
    NoRuleEffect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PowerUp {
    pub id: PowerUpId,
    pub display_name: &'static str,
    pub description: &'static str,
    pub emoji: &'static str,
    pub effect: EffectTag,
}

/// Wheel order. Only selection fairness depends on it.
pub const CATALOG: [PowerUp; 6] = [
    PowerUp {
        id: PowerUpId::PushAttack,
        display_name: "Push Attack",
        description: "Push opponent back 5 spaces",
        emoji: "🎯",
        effect: EffectTag::NoRuleEffect,
    },
    PowerUp {
        id: PowerUpId::DoubleDice,
        display_name: "Double Dice",
        description: "Roll value is doubled!",
        emoji: "🎲",
        effect: EffectTag::DoublesRoll,
    },
    PowerUp {
        id: PowerUpId::GhostMode,
        display_name: "Ghost Mode",
        description: "Pass through snakes",
        emoji: "👻",
        effect: EffectTag::IgnoresSnakes,
    },
    PowerUp {
        id: PowerUpId::ReverseLadder,
        display_name: "Reverse Ladder",
        description: "Use ladders backwards",
        emoji: "🔁",
        effect: EffectTag::ReversesLadders,
    },
    PowerUp {
        id: PowerUpId::TrapTile,
        display_name: "Trap Tile",
        description: "Place a trap for your opponent",
        emoji: "💣",
        effect: EffectTag::NoRuleEffect,
    },
    PowerUp {
        id: PowerUpId::MysteryPowerup,
        display_name: "Mystery Powerup",
        description: "Random helpful effect",
        emoji: "🎁",
        effect: EffectTag::NoRuleEffect,
    },
];

impl PowerUpId {
    pub fn all() -> impl Iterator<Item = PowerUpId> {
        CATALOG.iter().map(|p| p.id)
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "pushattack" => Some(PowerUpId::PushAttack),
            "doubledice" => Some(PowerUpId::DoubleDice),
            "ghostmode" => Some(PowerUpId::GhostMode),
            "reverseladder" => Some(PowerUpId::ReverseLadder),
            "traptile" => Some(PowerUpId::TrapTile),
            "mysterypowerup" => Some(PowerUpId::MysteryPowerup),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpId::PushAttack => "push-attack",
            PowerUpId::DoubleDice => "double-dice",
            PowerUpId::GhostMode => "ghost-mode",
            PowerUpId::ReverseLadder => "reverse-ladder",
            PowerUpId::TrapTile => "trap-tile",
            PowerUpId::MysteryPowerup => "mystery-powerup",
        }
    }

    pub fn power_up(self) -> PowerUp {
        power_up(self)
    }
}

/// Catalog entry for an id
pub fn power_up(id: PowerUpId) -> PowerUp {
    // Every id has exactly one catalog slot, in declaration order
    CATALOG[id as usize]
}

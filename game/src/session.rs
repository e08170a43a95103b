//! Session controller: the only owner of a game's state.
//!
//! A session sequences roll requests through the random source, the resolver
//! and the state machine, then tells its observers what happened. Every
//! transition is computed on a working copy and swapped in whole, so
//! observers only ever see committed states.

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::engine::{
    GameMode, GameSnapshot, GameState, IgnoredReason, MoveRecord, PlayerId, PowerUp, PowerUpId,
    RandomSource, Rules,
};

/// Hooks for the rendering, audio and log layers. All methods default to no-ops.
pub trait SessionObserver {
    fn on_state_change(&mut self, _snapshot: &GameSnapshot) {}
    fn on_move_resolved(&mut self, _record: &MoveRecord) {}
    fn on_power_up_offered(&mut self, _snapshot: &GameSnapshot) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollOutcome {
    Moved(MoveRecord),
    Ignored(IgnoredReason),
}

impl RollOutcome {
    pub fn record(&self) -> Option<&MoveRecord> {
        match self {
            RollOutcome::Moved(record) => Some(record),
            RollOutcome::Ignored(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationOutcome {
    Activated { owner: PlayerId, power_up: PowerUpId },
    Ignored(IgnoredReason),
}

pub struct Session<R> {
    id: Uuid,
    started_at: DateTime<Utc>,
    state: GameState,
    random: R,
    observers: Vec<Box<dyn SessionObserver + Send>>,
}

impl<R: RandomSource> Session<R> {
    pub fn new(rules: Rules, random: R) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            state: GameState::new(rules),
            random,
            observers: Vec::new(),
        }
    }

    pub fn with_observer(mut self, observer: impl SessionObserver + Send + 'static) -> Self {
        self.add_observer(observer);
        self
    }

    pub fn add_observer(&mut self, observer: impl SessionObserver + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.state.snapshot()
    }

    pub fn offer_pending(&self) -> bool {
        self.state.offer_pending()
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// Roll for the current player. A no-op while a roll is in flight, while a
    /// power-up offer is waiting for an answer, or once the game is over.
    pub fn request_roll(&mut self) -> RollOutcome {
        let mut next = self.state.clone();

        let player = match next.begin_roll() {
            Ok(player) => player,
            Err(reason) => {
                debug!(session_id = %self.id, reason = reason.as_str(), "Ignoring roll request");
                return RollOutcome::Ignored(reason);
            }
        };

        let die_value = self.random.roll_die();
        let record = next.commit_roll(die_value);
        let offered = next.advance();
        self.state = next;

        info!(
            session_id = %self.id,
            player = player.number(),
            die = die_value,
            from = record.from_tile,
            to = record.to_tile,
            event = record.event_kind.as_str(),
            "{}",
            record.describe()
        );

        if let Some(winner) = self.state.winner() {
            info!(
                session_id = %self.id,
                winner = winner.number(),
                rolls = self.state.rolls_count(),
                "Game over"
            );
        }

        let snapshot = self.state.snapshot();
        for observer in &mut self.observers {
            observer.on_move_resolved(&record);
            observer.on_state_change(&snapshot);
        }

        if offered {
            info!(
                session_id = %self.id,
                player = self.state.current_player().number(),
                rolls = self.state.rolls_count(),
                "Power-up offered"
            );
            for observer in &mut self.observers {
                observer.on_power_up_offered(&snapshot);
            }
        }

        RollOutcome::Moved(record)
    }

    /// Answer the pending offer with the wheel's (or player's) choice
    pub fn activate_power_up(&mut self, power_up: PowerUp) -> ActivationOutcome {
        let mut next = self.state.clone();

        match next.activate_power_up(power_up) {
            Ok(owner) => {
                self.state = next;
                info!(
                    session_id = %self.id,
                    player = owner.number(),
                    power_up = power_up.id.as_str(),
                    "{owner} activated {}! {}",
                    power_up.display_name,
                    power_up.emoji
                );
                self.notify_state_change();
                ActivationOutcome::Activated {
                    owner,
                    power_up: power_up.id,
                }
            }
            Err(reason) => {
                debug!(session_id = %self.id, reason = reason.as_str(), "Ignoring power-up activation");
                ActivationOutcome::Ignored(reason)
            }
        }
    }

    /// Let the random source pick the power-up, as the selection wheel does
    pub fn spin_power_up_wheel(&mut self) -> ActivationOutcome {
        if !self.state.offer_pending() {
            return ActivationOutcome::Ignored(IgnoredReason::NoOfferPending);
        }
        let power_up = self.random.select_power_up();
        self.activate_power_up(power_up)
    }

    /// Start over with the same rules. Nothing from the previous game survives.
    pub fn reset(&mut self) {
        self.state = GameState::new(self.state.rules().clone());
        self.started_at = Utc::now();
        info!(session_id = %self.id, mode = self.state.rules().mode.as_str(), "Game reset");
        self.notify_state_change();
    }

    /// Switching modes always starts a fresh game
    pub fn set_mode(&mut self, mode: GameMode) {
        let rules = Rules {
            mode,
            ..self.state.rules().clone()
        };
        self.state = GameState::new(rules);
        self.reset();
    }

    fn notify_state_change(&mut self) {
        let snapshot = self.state.snapshot();
        for observer in &mut self.observers {
            observer.on_state_change(&snapshot);
        }
    }
}

// Game runner - drives a session to completion without a human at the controls

use serde::Serialize;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::engine::{MAX_ROLLS, PlayerId, RandomSource, Stats};
use crate::session::{RollOutcome, Session};

pub struct GameRunner {
    roll_delay: Duration,
    max_rolls: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameResult {
    pub winner: Option<PlayerId>,
    pub rolls: u32,
    pub stats: Stats,
    pub cancelled: bool,
}

impl Default for GameRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl GameRunner {
    pub fn new() -> Self {
        Self {
            roll_delay: Duration::from_millis(1000), // Long enough to follow each move
            max_rolls: MAX_ROLLS,
        }
    }

    pub fn with_roll_delay(mut self, delay: Duration) -> Self {
        self.roll_delay = delay;
        self
    }

    pub fn with_max_rolls(mut self, max_rolls: u32) -> Self {
        self.max_rolls = max_rolls;
        self
    }

    /// Advance the session by one action: answer a pending offer with the
    /// wheel, or roll for whoever is up. Returns false once nothing is left to do.
    pub fn step<R: RandomSource>(&self, session: &mut Session<R>) -> bool {
        if session.is_game_over() || session.state().rolls_count() >= self.max_rolls {
            return false;
        }

        if session.offer_pending() {
            session.spin_power_up_wheel();
            return true;
        }

        matches!(session.request_roll(), RollOutcome::Moved(_))
    }

    /// Play the whole game immediately, no pacing
    pub fn play_out<R: RandomSource>(&self, session: &mut Session<R>) -> GameResult {
        while self.step(session) {}
        self.result(session, false)
    }

    /// Play the game with a pause between rolls so watchers can follow along
    pub async fn run_game<R: RandomSource + Send>(
        &self,
        session: &mut Session<R>,
        cancel: &CancellationToken,
    ) -> GameResult {
        info!(
            session_id = %session.id(),
            mode = session.state().rules().mode.as_str(),
            "Starting autoplay game"
        );

        let mut cancelled = false;
        while self.step(session) {
            tokio::select! {
                _ = cancel.cancelled() => {
                    cancelled = true;
                    break;
                }
                _ = sleep(self.roll_delay) => {}
            }
        }

        let result = self.result(session, cancelled);
        if cancelled {
            warn!(session_id = %session.id(), rolls = result.rolls, "Autoplay game cancelled");
        } else {
            info!(
                session_id = %session.id(),
                winner = ?result.winner,
                rolls = result.rolls,
                "Autoplay game finished"
            );
        }
        result
    }

    fn result<R: RandomSource>(&self, session: &Session<R>, cancelled: bool) -> GameResult {
        let state = session.state();
        if state.winner().is_none() && !cancelled {
            warn!(
                session_id = %session.id(),
                max_rolls = self.max_rolls,
                "Game hit the roll cap without a winner"
            );
        }

        GameResult {
            winner: state.winner(),
            rolls: state.rolls_count(),
            stats: *state.stats(),
            cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Board, Rules, SeededRandom};

    #[test]
    fn test_play_out_finishes_with_a_winner() {
        let mut session = Session::new(Rules::twist(), SeededRandom::new(1));
        let result = GameRunner::new().play_out(&mut session);

        assert!(result.winner.is_some());
        assert!(!result.cancelled);
        assert_eq!(result.rolls, session.state().rolls_count());
        assert_eq!(result.rolls as usize, session.state().history().len());
    }

    #[test]
    fn test_seeded_games_are_reproducible() {
        let runner = GameRunner::new();

        let mut first = Session::new(Rules::twist(), SeededRandom::new(99));
        let mut second = Session::new(Rules::twist(), SeededRandom::new(99));

        assert_eq!(runner.play_out(&mut first), runner.play_out(&mut second));
        assert_eq!(first.state().history(), second.state().history());
    }

    #[test]
    fn test_max_rolls_caps_the_game() {
        // Every other tile bites, so nobody gets far
        let board = Board::new((10..99).step_by(2).map(|head| (head, 2)), []).unwrap();
        let mut session = Session::new(Rules::classic().with_board(board), SeededRandom::new(5));

        let result = GameRunner::new()
            .with_max_rolls(12)
            .play_out(&mut session);
        assert!(result.rolls <= 12);
    }

    #[test]
    fn test_positions_stay_on_the_board() {
        for seed in 0..20 {
            let mut session = Session::new(Rules::twist(), SeededRandom::new(seed));
            let runner = GameRunner::new();
            while runner.step(&mut session) {
                let positions = session.state().positions();
                assert!((1..=100).contains(&positions.one));
                assert!((1..=100).contains(&positions.two));
            }
        }
    }

    #[tokio::test]
    async fn test_run_game_with_zero_delay() {
        let mut session = Session::new(Rules::classic(), SeededRandom::new(3));
        let result = GameRunner::new()
            .with_roll_delay(Duration::ZERO)
            .run_game(&mut session, &CancellationToken::new())
            .await;

        assert!(result.winner.is_some());
        assert!(!result.cancelled);
    }

    #[tokio::test]
    async fn test_run_game_stops_when_cancelled() {
        let mut session = Session::new(Rules::classic(), SeededRandom::new(3));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = GameRunner::new()
            .with_roll_delay(Duration::from_secs(60))
            .run_game(&mut session, &cancel)
            .await;

        assert!(result.cancelled);
        assert_eq!(result.rolls, 1);
        assert!(result.winner.is_none());
    }
}

// Sources of chance: die faces and power-up wheel picks

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

use super::power_up::{CATALOG, PowerUp, PowerUpId, power_up};

pub const DIE_FACES: u8 = 6;

/// Everything random in a game goes through this trait so tests and replays
/// can substitute a fixed sequence.
pub trait RandomSource {
    /// A face in `1..=6`, uniformly distributed
    fn roll_die(&mut self) -> u8;
    /// A catalog entry, uniformly distributed
    fn select_power_up(&mut self) -> PowerUp;
}

fn roll_with(rng: &mut impl Rng) -> u8 {
    rng.gen_range(1..=DIE_FACES)
}

fn pick_with(rng: &mut impl Rng) -> PowerUp {
    // CATALOG is never empty
    *CATALOG.choose(rng).unwrap_or(&CATALOG[0])
}

// Fresh entropy per call via the thread-local generator
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn roll_die(&mut self) -> u8 {
        roll_with(&mut rand::thread_rng())
    }

    fn select_power_up(&mut self) -> PowerUp {
        pick_with(&mut rand::thread_rng())
    }
}

/// Reproducible games: the same seed always plays out the same way
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn roll_die(&mut self) -> u8 {
        roll_with(&mut self.rng)
    }

    fn select_power_up(&mut self) -> PowerUp {
        pick_with(&mut self.rng)
    }
}

/// Replays fixed sequences of dice and wheel results.
///
/// Running out of either sequence is a bug in the caller and panics.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    dice: VecDeque<u8>,
    power_ups: VecDeque<PowerUpId>,
}

impl ScriptedRandom {
    pub fn new(dice: impl IntoIterator<Item = u8>) -> Self {
        Self {
            dice: dice.into_iter().collect(),
            power_ups: VecDeque::new(),
        }
    }

    pub fn with_power_ups(mut self, power_ups: impl IntoIterator<Item = PowerUpId>) -> Self {
        self.power_ups.extend(power_ups);
        self
    }

    pub fn remaining_dice(&self) -> usize {
        self.dice.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn roll_die(&mut self) -> u8 {
        let face = self.dice.pop_front().expect("scripted dice exhausted");
        assert!(
            (1..=DIE_FACES).contains(&face),
            "scripted die face out of range: {face}"
        );
        face
    }

    fn select_power_up(&mut self) -> PowerUp {
        power_up(
            self.power_ups
                .pop_front()
                .expect("scripted power-ups exhausted"),
        )
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn roll_die(&mut self) -> u8 {
        (**self).roll_die()
    }

    fn select_power_up(&mut self) -> PowerUp {
        (**self).select_power_up()
    }
}

use rand::Rng;
use tracing::trace;

use crate::{
    constants::play,
    scenes::play::pipe::{PairId, Pipes},
};

/// Emits a pipe pair every `interval` milliseconds of play.
#[derive(Debug, Clone, PartialEq)]
pub struct Spawner {
    interval: f64,
    last_spawn: f64,
}

impl Spawner {
    pub fn new(interval: f64) -> Self {
        Spawner { interval, last_spawn: 0.0 }
    }

    pub fn reset(&mut self, now: f64) {
        self.last_spawn = now;
    }

    pub fn last_spawn(&self) -> f64 {
        self.last_spawn
    }

    pub fn is_due(&self, now: f64) -> bool {
        now > self.last_spawn + self.interval
    }

    pub fn tick<R: Rng + ?Sized>(&mut self, now: f64, rng: &mut R, pipes: &mut Pipes) -> Option<PairId> {
        if !self.is_due(now) {
            return None;
        }
        self.last_spawn = now;
        Some(spawn_pair(rng, pipes))
    }
}

impl Default for Spawner {
    fn default() -> Self {
        Self::new(play::PIPE_SPAWN_INTERVAL)
    }
}

/// Adds a pair at the spawn column with its gap centered on a random row.
pub fn spawn_pair<R: Rng + ?Sized>(rng: &mut R, pipes: &mut Pipes) -> PairId {
    let gap_center = rng.gen_range(play::PIPE_GAP_MIN..=play::PIPE_GAP_MAX);
    let pair = pipes.push_pair(play::PIPE_SPAWN_X, gap_center as f32);
    trace!(pair, gap_center, "spawned pipes");
    pair
}

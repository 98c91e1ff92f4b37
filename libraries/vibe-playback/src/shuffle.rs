//! Random cursor selection for shuffled music playback
//!
//! Shuffle does not reorder the queue. Each `next`/`previous` picks a
//! uniformly random index, so the same index can come up twice in a row.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of shuffled queue positions
#[derive(Debug, Clone)]
pub struct Shuffler {
    rng: StdRng,
}

impl Shuffler {
    /// Shuffler seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic shuffler for tests and replays
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniformly random index in `[0, len)`, `None` for an empty queue
    pub fn pick(&mut self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.rng.gen_range(0..len))
    }
}

impl Default for Shuffler {
    fn default() -> Self {
        Self::new()
    }
}

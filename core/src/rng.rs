//! Seeded random number generation for the game tables.
//!
//! RULE: No game draws from a platform RNG directly.
//! All randomness flows through GameRng streams derived from the
//! single master seed stored on the play_session record.
//!
//! Each game gets its own stream, seeded from
//! (master_seed XOR stream_index * golden ratio). This means:
//!   - Playing one game never shifts another game's draws.
//!   - A whole session replays identically from its seed.

use crate::types::GameId;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;
use std::collections::HashMap;

/// A named, deterministic RNG for a single game.
pub struct GameRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl GameRng {
    pub fn new(master_seed: u64, stream_index: u64) -> Self {
        let derived_seed = master_seed ^ (stream_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a usize in [0, n).
    pub fn below(&mut self, n: usize) -> usize {
        assert!(n > 0, "n must be > 0");
        (self.inner.next_u64() % n as u64) as usize
    }

    /// Roll a u64 in [lo, hi). Returns `lo` when the range is empty.
    pub fn range_u64(&mut self, lo: u64, hi: u64) -> u64 {
        if hi <= lo {
            return lo;
        }
        lo + self.inner.next_u64() % (hi - lo)
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Fisher–Yates shuffle in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.below(i + 1);
            items.swap(i, j);
        }
    }
}

/// All game RNG streams for a single session.
/// Streams are created lazily and live as long as the bank, so leaving
/// and re-entering a game continues its stream instead of replaying it.
pub struct RngBank {
    master_seed: u64,
    streams: HashMap<GameId, GameRng>,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed, streams: HashMap::new() }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    pub fn for_game(&mut self, game: GameId) -> &mut GameRng {
        let seed = self.master_seed;
        self.streams.entry(game).or_insert_with(|| {
            GameRng::new(seed, game.stream_index()).with_name(game.as_str())
        })
    }
}

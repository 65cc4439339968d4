//! Random source for combat rolls
//!
//! Every roll the engine makes goes through [`CombatRng`], so a resolution can
//! be replayed exactly by injecting a seeded or scripted generator.

use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Shared random source. Implementations must be usable from several worker
/// threads at once.
pub trait CombatRng: Send + Sync {
    /// Uniform integer in `[0, bound)`. A zero bound yields 0.
    fn below(&self, bound: u32) -> u32;

    /// Uniform roll in `[0, 100)`
    fn percentile(&self) -> i32 {
        self.below(100) as i32
    }

    /// Uniform integer in `[min, max]`; returns `min` when the range is empty
    fn between(&self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        let span = (max - min) as u32 + 1;
        min + self.below(span) as i32
    }

    /// Fair coin
    fn coin_flip(&self) -> bool {
        self.below(2) == 0
    }
}

/// Reproducible generator seeded once at startup
#[derive(Debug)]
pub struct SeededRng {
    inner: Mutex<ChaCha8Rng>,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        SeededRng {
            inner: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }
}

impl CombatRng for SeededRng {
    fn below(&self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.inner.lock().gen_range(0..bound)
    }
}

/// Non-reproducible generator backed by the thread-local rng
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRng;

impl CombatRng for ThreadRng {
    fn below(&self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..bound)
    }
}

/// Replays a fixed sequence of raw values, cycling when exhausted.
///
/// Each value is clamped to `bound - 1`, so a script entry of `99` always
/// means "highest possible roll" and `0` always means "lowest".
#[derive(Debug)]
pub struct ScriptedRng {
    values: Vec<u32>,
    cursor: AtomicUsize,
}

impl ScriptedRng {
    pub fn new(values: Vec<u32>) -> Self {
        ScriptedRng {
            values,
            cursor: AtomicUsize::new(0),
        }
    }

    /// A generator that always rolls the same value
    pub fn constant(value: u32) -> Self {
        Self::new(vec![value])
    }

    /// Number of values consumed so far
    pub fn consumed(&self) -> usize {
        self.cursor.load(Ordering::Relaxed)
    }
}

impl CombatRng for ScriptedRng {
    fn below(&self, bound: u32) -> u32 {
        if bound == 0 || self.values.is_empty() {
            return 0;
        }
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.values.len();
        self.values[index].min(bound - 1)
    }
}

//! Per-call execution context: the clock reading and random source a tool sees.
//!
//! Tools never reach for the system clock or a global RNG. The registry hands
//! each call a [`ToolContext`] built from its [`ToolEnvironment`], so a test can
//! pin both with [`FixedClock`] and a seed.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Shared, read-only inputs used to build a context for every call.
#[derive(Clone)]
pub struct ToolEnvironment {
    clock: Arc<dyn Clock>,
    seed: Option<u64>,
}

impl ToolEnvironment {
    /// Environment backed by the system clock and an entropy-seeded RNG.
    pub fn system() -> Self {
        Self {
            clock: Arc::new(SystemClock),
            seed: None,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Seed every call's RNG with the same value.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Build the context for a single tool call.
    pub fn context(&self) -> ToolContext {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        ToolContext {
            now: self.clock.now(),
            rng,
        }
    }
}

impl Default for ToolEnvironment {
    fn default() -> Self {
        Self::system()
    }
}

impl fmt::Debug for ToolEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolEnvironment")
            .field("now", &self.clock.now())
            .field("seed", &self.seed)
            .finish()
    }
}

/// What a single tool invocation may observe besides its arguments.
pub struct ToolContext {
    now: DateTime<Utc>,
    rng: StdRng,
}

impl ToolContext {
    pub fn new(now: DateTime<Utc>, seed: u64) -> Self {
        Self {
            now,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The instant this call started. Stable for the whole call.
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Uniform float in `[0, 1)`.
    pub fn random(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }

    /// Uniform index in `[0, len)`. `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    /// Pick one element of a non-empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.index(items.len())]
    }

    /// `floor(random * (max - min) + min)`.
    pub fn int_between(&mut self, min: i64, max: i64) -> i64 {
        (self.random() * (max - min) as f64 + min as f64).floor() as i64
    }

    pub fn fill_bytes(&mut self, bytes: &mut [u8]) {
        self.rng.fill_bytes(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_clock_is_used() {
        let at = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let env = ToolEnvironment::system().with_clock(FixedClock(at));
        assert_eq!(env.context().now(), at);
    }

    #[test]
    fn test_seeded_contexts_repeat() {
        let env = ToolEnvironment::system().with_seed(Some(7));
        let a: Vec<usize> = {
            let mut ctx = env.context();
            (0..8).map(|_| ctx.index(1000)).collect()
        };
        let b: Vec<usize> = {
            let mut ctx = env.context();
            (0..8).map(|_| ctx.index(1000)).collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn test_int_between_bounds() {
        let mut ctx = ToolContext::new(Utc::now(), 1);
        for _ in 0..200 {
            let n = ctx.int_between(18, 65);
            assert!((18..65).contains(&n));
        }
    }
}

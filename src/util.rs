#[cfg(test)]
#[path = "./util_test.rs"]
mod util_test;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Deterministic-seedable random source. All randomness in the core goes
/// through this so a fixed seed replays a session exactly.
pub struct Rnd(SmallRng);

pub fn new_rnd(seed: u64) -> Rnd {
    Rnd(SmallRng::seed_from_u64(seed))
}

impl Rnd {
    /// Uniform integer in 0..=max.
    pub fn rand(&mut self, max: i32) -> i32 {
        if max <= 0 {
            return 0;
        }
        self.0.gen_range(0..=max)
    }

    /// Uniform integer in lo..=hi.
    pub fn rand_between(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.0.gen_range(lo..=hi)
    }
}

//! Seeded random source shared by every generation stage.
//!
//! A generation session owns exactly one [`RandomSource`] and hands it to each
//! stage by `&mut` in a fixed order, so the draw sequence (and therefore the
//! whole dungeon) is reproducible from the seed alone.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::constants::RANDOM_DEFAULT_ROLL_COUNT;

/// Which extreme the biased policy keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bias {
    #[default]
    Lower,
    Upper,
}

/// How a single value is produced from the underlying generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RandomPolicy {
    /// One draw per value
    #[default]
    Uniform,
    /// `roll_count` draws per value, keeping the lowest or highest
    Biased {
        #[serde(default = "default_roll_count")]
        roll_count: u32,
        #[serde(default)]
        bias: Bias,
    },
}

fn default_roll_count() -> u32 {
    RANDOM_DEFAULT_ROLL_COUNT
}

/// Deterministic number source. Same seed and same call sequence give the
/// same outputs on every platform.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: ChaCha8Rng,
    policy: RandomPolicy,
    seed: u64,
}

impl RandomSource {
    pub fn new(seed: u64, policy: RandomPolicy) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            policy,
            seed,
        }
    }

    pub fn uniform(seed: u64) -> Self {
        Self::new(seed, RandomPolicy::Uniform)
    }

    pub fn biased(seed: u64, roll_count: u32, bias: Bias) -> Self {
        Self::new(seed, RandomPolicy::Biased { roll_count, bias })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn policy(&self) -> RandomPolicy {
        self.policy
    }

    /// Integer in `[min, max)`. An empty range yields `min`.
    pub fn next_int(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        self.roll(|rng| rng.gen_range(min..max))
    }

    /// Index-sized integer in `[min, max)`. An empty range yields `min`.
    pub fn next_usize(&mut self, min: usize, max: usize) -> usize {
        if max <= min {
            return min;
        }
        self.roll(|rng| rng.gen_range(min..max))
    }

    /// Float in `[min, max)`. An empty or inverted range yields `min`.
    pub fn next_float(&mut self, min: f32, max: f32) -> f32 {
        if !(max > min) {
            return min;
        }
        self.roll(|rng| rng.gen_range(min..max))
    }

    /// Uniform point inside the unit sphere. Ignores the bias policy.
    pub fn point_in_unit_sphere(&mut self) -> Vec3 {
        loop {
            let p = Vec3::new(
                self.rng.gen_range(-1.0f32..1.0),
                self.rng.gen_range(-1.0f32..1.0),
                self.rng.gen_range(-1.0f32..1.0),
            );
            if p.length_squared() <= 1.0 {
                return p;
            }
        }
    }

    /// Apply the policy to a raw draw.
    fn roll<T, F>(&mut self, mut draw: F) -> T
    where
        T: PartialOrd + Copy,
        F: FnMut(&mut ChaCha8Rng) -> T,
    {
        match self.policy {
            RandomPolicy::Uniform => draw(&mut self.rng),
            RandomPolicy::Biased { roll_count, bias } => {
                let first = draw(&mut self.rng);
                let mut lowest = first;
                let mut highest = first;
                for _ in 1..roll_count.max(1) {
                    let r = draw(&mut self.rng);
                    if r < lowest {
                        lowest = r;
                    }
                    if r > highest {
                        highest = r;
                    }
                }
                match bias {
                    Bias::Lower => lowest,
                    Bias::Upper => highest,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = RandomSource::uniform(42);
        let mut b = RandomSource::uniform(42);
        for _ in 0..64 {
            assert_eq!(a.next_int(0, 1000), b.next_int(0, 1000));
            assert_eq!(a.next_float(-5.0, 5.0).to_bits(), b.next_float(-5.0, 5.0).to_bits());
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = RandomSource::uniform(1);
        let mut b = RandomSource::uniform(2);
        let draws_a: Vec<i32> = (0..16).map(|_| a.next_int(0, 1_000_000)).collect();
        let draws_b: Vec<i32> = (0..16).map(|_| b.next_int(0, 1_000_000)).collect();
        assert_ne!(draws_a, draws_b);
    }

    #[test]
    fn test_values_stay_in_range() {
        let mut random = RandomSource::biased(7, 3, Bias::Upper);
        for _ in 0..500 {
            let i = random.next_int(-3, 9);
            assert!((-3..9).contains(&i));
            let f = random.next_float(1.5, 2.5);
            assert!((1.5..2.5).contains(&f));
        }
    }

    #[test]
    fn test_empty_range_returns_min() {
        let mut random = RandomSource::uniform(3);
        assert_eq!(random.next_int(5, 5), 5);
        assert_eq!(random.next_usize(4, 2), 4);
        assert_eq!(random.next_float(2.0, 2.0), 2.0);
    }

    #[test]
    fn test_biased_lower_skews_down() {
        let mut uniform = RandomSource::uniform(11);
        let mut lower = RandomSource::biased(11, 4, Bias::Lower);
        let mut upper = RandomSource::biased(11, 4, Bias::Upper);

        let n = 2000;
        let mean = |r: &mut RandomSource| (0..n).map(|_| r.next_float(0.0, 1.0)).sum::<f32>() / n as f32;

        let uniform_mean = mean(&mut uniform);
        let lower_mean = mean(&mut lower);
        let upper_mean = mean(&mut upper);

        // Min of 4 uniforms has mean 0.2, max has mean 0.8
        assert!(lower_mean < uniform_mean - 0.15);
        assert!(upper_mean > uniform_mean + 0.15);
    }

    #[test]
    fn test_single_roll_biased_matches_uniform() {
        let mut uniform = RandomSource::uniform(99);
        let mut biased = RandomSource::biased(99, 1, Bias::Upper);
        for _ in 0..32 {
            assert_eq!(uniform.next_int(0, 100), biased.next_int(0, 100));
        }
    }

    #[test]
    fn test_unit_sphere_points_inside() {
        let mut random = RandomSource::biased(5, 4, Bias::Lower);
        for _ in 0..500 {
            assert!(random.point_in_unit_sphere().length() <= 1.0 + f32::EPSILON);
        }
    }
}

//! Random sampling used for spawn parameters.

/// Uniform sampling in numeric ranges, the two flavors the scene needs.
pub trait RandomSource {
    /// Uniform integer in `[min, max]`, both ends inclusive.
    fn between(&mut self, min: i32, max: i32) -> i32;

    /// Uniform float in `[min, max)`.
    fn float_between(&mut self, min: f32, max: f32) -> f32;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn between(&mut self, min: i32, max: i32) -> i32 {
        (**self).between(min, max)
    }

    fn float_between(&mut self, min: f32, max: f32) -> f32 {
        (**self).float_between(min, max)
    }
}

/// [`RandomSource`] backed by `fastrand`.
#[derive(Clone, Debug)]
pub struct FastRandSource {
    rng: fastrand::Rng,
}

impl FastRandSource {
    /// Randomly seeded generator.
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    /// Deterministic generator; identical seeds give identical runs.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Default for FastRandSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for FastRandSource {
    fn between(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        self.rng.i32(min..=max)
    }

    fn float_between(&mut self, min: f32, max: f32) -> f32 {
        min + self.rng.f32() * (max - min)
    }
}

//! Random sources for estimator jitter

use rand::rngs::{StdRng, ThreadRng};
use rand::{RngExt, SeedableRng};

/// Supplies uniform samples for estimator jitter
pub trait NoiseSource {
    /// Next sample in `[0, 1)`
    fn next_unit(&mut self) -> f64;

    /// Centered jitter spanning `amplitude`, i.e. `(u - 0.5) * amplitude`
    fn jitter(&mut self, amplitude: f64) -> f64 {
        (self.next_unit() - 0.5) * amplitude
    }
}

impl<N: NoiseSource + ?Sized> NoiseSource for &mut N {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Noise drawn from a `rand` generator
#[derive(Debug, Clone)]
pub struct RandomNoise<R> {
    rng: R,
}

impl<R> RandomNoise<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomNoise<ThreadRng> {
    /// Noise from the thread-local generator
    #[must_use]
    pub fn thread() -> Self {
        Self::new(rand::rng())
    }
}

impl Default for RandomNoise<ThreadRng> {
    fn default() -> Self {
        Self::thread()
    }
}

impl RandomNoise<StdRng> {
    /// Reproducible noise for a given seed
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: RngExt> NoiseSource for RandomNoise<R> {
    fn next_unit(&mut self) -> f64 {
        self.rng.random_range(0.0..1.0)
    }
}

/// Always returns the same sample; `FixedNoise(0.5)` disables jitter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedNoise(pub f64);

impl FixedNoise {
    /// No jitter at all
    pub const CENTERED: FixedNoise = FixedNoise(0.5);
}

impl NoiseSource for FixedNoise {
    fn next_unit(&mut self) -> f64 {
        self.0
    }
}

//! Deterministic random number generation.
//!
//! Uses a seeded PRNG (Xoshiro256**) that produces identical sequences
//! for identical seeds, so a sampling pass can be replayed from its seed.

use rand::distributions::Distribution;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

/// Deterministic random number generator.
///
/// Wraps Xoshiro256** with a seed for reproducibility.
/// Given the same seed, always produces the same sequence.
///
/// # Example
///
/// ```rust
/// use rh_rng::DeterministicRng;
///
/// let mut rng = DeterministicRng::new(12345);
/// let a: u64 = rng.gen();
/// let b: u64 = rng.gen();
///
/// // Same seed produces same sequence
/// let mut rng2 = DeterministicRng::new(12345);
/// assert_eq!(rng2.gen::<u64>(), a);
/// assert_eq!(rng2.gen::<u64>(), b);
/// ```
#[derive(Debug, Clone)]
pub struct DeterministicRng {
    seed: u64,
    rng: Xoshiro256StarStar,
    calls_count: u64,
}

/// Maximum number of RNG calls before warning.
const RNG_CALLS_WARNING_THRESHOLD: u64 = 1_000_000_000;

impl DeterministicRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Xoshiro256StarStar::seed_from_u64(seed),
            calls_count: 0,
        }
    }

    /// Create an RNG from a freshly drawn entropy seed.
    ///
    /// The seed is still recorded, so the stream can be replayed with
    /// [`DeterministicRng::new`].
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random::<u64>())
    }

    /// Get the seed used to create this RNG.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Get number of draw calls made.
    #[must_use]
    pub fn calls_count(&self) -> u64 {
        self.calls_count
    }

    fn count_call(&mut self) {
        self.calls_count += 1;
        debug_assert!(
            self.calls_count < RNG_CALLS_WARNING_THRESHOLD,
            "Very high number of RNG calls - possible infinite loop"
        );
    }

    /// Generate a random value of type T.
    pub fn gen<T>(&mut self) -> T
    where
        rand::distributions::Standard: Distribution<T>,
    {
        self.count_call();
        self.rng.gen()
    }

    /// Generate a random value in the given range.
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.count_call();
        self.rng.gen_range(range)
    }

    /// Generate a boolean with the given probability of true.
    pub fn gen_bool(&mut self, probability: f64) -> bool {
        debug_assert!(
            (0.0..=1.0).contains(&probability),
            "Probability must be in [0.0, 1.0]"
        );
        self.count_call();
        self.rng.gen_bool(probability)
    }

    /// Choose a random element from a slice.
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        self.count_call();
        slice.choose(&mut self.rng)
    }

    /// Draw a single value from a distribution.
    pub fn sample<T, D>(&mut self, distribution: &D) -> T
    where
        D: Distribution<T>,
    {
        self.count_call();
        distribution.sample(&mut self.rng)
    }

    /// Draw `count` i.i.d. values from a distribution in one call.
    ///
    /// Counts as a single draw call regardless of `count`.
    pub fn sample_n<T, D>(&mut self, distribution: &D, count: u64) -> Vec<T>
    where
        D: Distribution<T>,
    {
        self.count_call();
        let rng = &mut self.rng;
        (0..count).map(|_| distribution.sample(rng)).collect()
    }

    /// Draw a seed for a derived stream.
    pub fn derive_seed(&mut self) -> u64 {
        self.gen::<u64>()
    }

    /// Fork this RNG into a new one with a derived seed.
    ///
    /// Useful for giving each family member its own deterministic stream.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        let new_seed = self.derive_seed();
        Self::new(new_seed)
    }

    /// Reset to initial state (same seed).
    pub fn reset(&mut self) {
        self.rng = Xoshiro256StarStar::seed_from_u64(self.seed);
        self.calls_count = 0;
    }
}

use rand::{Rng, RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

/// Deterministic source of uniform draws.
///
/// Backed by xoshiro256** seeded through SplitMix64, so two sources built
/// from the same seed yield the same stream on every platform. A source is
/// owned by the generation call that created it and is never shared.
#[derive(Debug, Clone)]
pub struct RandomSource {
	rng: Xoshiro256StarStar,
}

impl RandomSource {
	pub fn new(seed: u64) -> Self {
		Self { rng: Xoshiro256StarStar::seed_from_u64(seed) }
	}

	/// Uniform double in `[0, 1)`, built from the top 53 bits of one word.
	pub fn next_f64(&mut self) -> f64 {
		self.rng.random::<f64>()
	}

	/// Raw 64-bit word.
	pub fn next_u64(&mut self) -> u64 {
		self.rng.next_u64()
	}
}

use log::{trace, warn};

use super::distribution::Distribution;
use super::nucleotide::Nucleotide;

/// Picks the next base for a uniform `draw` in `[0, 1)`.
///
/// Scans the distribution in alphabet order with a running cumulative sum
/// and returns the first base whose cumulative mass is strictly greater
/// than `draw`. A cumulative sum equal to `draw` does not select its base.
///
/// Returns `Unknown` when no cumulative sum exceeds `draw`: an empty
/// distribution, or a normalized one whose total rounds slightly below the
/// draw.
pub fn sample(distribution: &Distribution, draw: f64) -> Nucleotide {
	let mut cumulative = 0.0;
	for (nucleotide, weight) in distribution.iter() {
		cumulative += weight;
		if cumulative > draw {
			return nucleotide;
		}
	}
	Nucleotide::Unknown
}

/// Counters for the recoverable paths of a generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SamplingStats {
	/// Steps sampled.
	pub draws: usize,
	/// Steps whose context had no entry in the table.
	pub missing_contexts: usize,
	/// Steps where a present distribution fell through to `Unknown`.
	pub fallbacks: usize,
}

impl SamplingStats {
	/// Number of `Unknown` bases emitted.
	pub fn unknowns(&self) -> usize {
		self.missing_contexts + self.fallbacks
	}
}

/// Stateful wrapper around [`sample`] that records how often generation
/// degraded to `Unknown`.
///
/// A missing context is sampled as an empty distribution. Both paths are
/// logged; the first occurrence at `warn`, later ones at `trace`.
#[derive(Debug, Default)]
pub struct Sampler {
	stats: SamplingStats,
}

impl Sampler {
	pub fn new() -> Self {
		Self::default()
	}

	/// Samples from `distribution`, or from the empty distribution when the
	/// context was not found. `context` is only used for logging.
	pub fn pick(&mut self, distribution: Option<&Distribution>, draw: f64, context: &dyn Fn() -> String) -> Nucleotide {
		self.stats.draws += 1;

		let Some(distribution) = distribution else {
			self.stats.missing_contexts += 1;
			if self.stats.missing_contexts == 1 {
				warn!("Context '{}' is missing from the transition table, emitting N", context());
			} else {
				trace!("Missing context '{}'", context());
			}
			return Nucleotide::Unknown;
		};

		let nucleotide = sample(distribution, draw);
		if !nucleotide.is_known() {
			self.stats.fallbacks += 1;
			if self.stats.fallbacks == 1 {
				warn!(
					"Cumulative probability of context '{}' never exceeded draw {} (total {}), emitting N",
					context(),
					draw,
					distribution.total()
				);
			} else {
				trace!("Sampling fallback for context '{}'", context());
			}
		}
		nucleotide
	}

	pub fn stats(&self) -> SamplingStats {
		self.stats
	}
}

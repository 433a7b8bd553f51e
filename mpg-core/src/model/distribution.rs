use serde::{Deserialize, Serialize};

use crate::error::{MpgError, Result};

use super::nucleotide::{Nucleotide, ALPHABET};

/// Probability mass over the next nucleotide.
///
/// Weights are stored in a fixed array indexed by alphabet position, so
/// iteration is always A, C, G, T. The sampler's cumulative scan depends on
/// that order for reproducibility.
///
/// # Invariants
/// - Weights are finite and non-negative (checked by `new`/`set`)
/// - After `normalize`, weights sum to 1.0 within floating-point tolerance
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct Distribution {
	weights: [f64; 4],
}

impl Distribution {
	/// Builds a distribution from weights in alphabet order.
	///
	/// # Errors
	/// Returns `InvalidWeight` if any weight is negative or not finite.
	pub fn new(weights: [f64; 4]) -> Result<Self> {
		let distribution = Self { weights };
		distribution.validate("")?;
		Ok(distribution)
	}

	/// All-zero distribution. Sampling it always yields `Unknown`.
	pub const fn empty() -> Self {
		Self { weights: [0.0; 4] }
	}

	/// 0.25 for every base.
	pub const fn uniform() -> Self {
		Self { weights: [0.25; 4] }
	}

	/// Weight of `nucleotide`; `Unknown` always has zero mass.
	pub fn weight(&self, nucleotide: Nucleotide) -> f64 {
		nucleotide.index().map_or(0.0, |i| self.weights[i])
	}

	/// Sets the weight of a base.
	///
	/// # Errors
	/// Returns `InvalidWeight` for a negative or non-finite weight, or when
	/// `nucleotide` is `Unknown`.
	pub fn set(&mut self, nucleotide: Nucleotide, weight: f64) -> Result<()> {
		match nucleotide.index() {
			Some(i) if weight.is_finite() && weight >= 0.0 => {
				self.weights[i] = weight;
				Ok(())
			}
			_ => Err(MpgError::InvalidWeight { context: String::new(), nucleotide, weight }),
		}
	}

	/// Iterates `(base, weight)` in alphabet order.
	pub fn iter(&self) -> impl Iterator<Item = (Nucleotide, f64)> + '_ {
		ALPHABET.iter().copied().zip(self.weights.iter().copied())
	}

	pub fn total(&self) -> f64 {
		self.weights.iter().sum()
	}

	/// Divides every weight by the total mass.
	///
	/// `context` is only used to label errors.
	///
	/// # Errors
	/// Returns `DegenerateDistribution` when the total is zero or not
	/// finite; the weights are left untouched.
	pub fn normalize(&mut self, context: &str) -> Result<()> {
		let sum = self.total();
		if !(sum.is_finite() && sum > 0.0) {
			return Err(MpgError::DegenerateDistribution { context: context.to_owned(), sum });
		}
		for weight in &mut self.weights {
			*weight /= sum;
		}
		Ok(())
	}

	/// Checks that every weight is finite and non-negative.
	pub(crate) fn validate(&self, context: &str) -> Result<()> {
		for (nucleotide, weight) in self.iter() {
			if !weight.is_finite() || weight < 0.0 {
				return Err(MpgError::InvalidWeight { context: context.to_owned(), nucleotide, weight });
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_iteration_order() {
		let d = Distribution::new([1.0, 2.0, 3.0, 4.0]).unwrap();
		let order: Vec<Nucleotide> = d.iter().map(|(n, _)| n).collect();
		assert_eq!(order, ALPHABET.to_vec());
		assert_eq!(d.weight(Nucleotide::G), 3.0);
		assert_eq!(d.weight(Nucleotide::Unknown), 0.0);
	}

	#[test]
	fn test_normalize_sums_to_one() {
		let mut d = Distribution::new([0.1, 0.4, 0.4, 0.1]).unwrap();
		d.normalize("A").unwrap();
		assert!((d.total() - 1.0).abs() < 1e-12);

		let mut d = Distribution::new([3.0, 1.0, 0.0, 0.0]).unwrap();
		d.normalize("A").unwrap();
		assert_eq!(d.weight(Nucleotide::A), 0.75);
		assert_eq!(d.weight(Nucleotide::C), 0.25);
	}

	#[test]
	fn test_normalize_is_idempotent() {
		let mut d = Distribution::new([0.3, 0.2, 0.7, 0.11]).unwrap();
		d.normalize("").unwrap();
		let before = d;
		d.normalize("").unwrap();
		for ((_, a), (_, b)) in before.iter().zip(d.iter()) {
			assert!((a - b).abs() < 1e-9);
		}
	}

	#[test]
	fn test_zero_sum_is_rejected() {
		let mut d = Distribution::empty();
		let err = d.normalize("ACG").unwrap_err();
		assert!(matches!(err, MpgError::DegenerateDistribution { ref context, .. } if context == "ACG"));
		assert_eq!(d, Distribution::empty());
	}

	#[test]
	fn test_invalid_weights() {
		assert!(Distribution::new([-0.1, 0.5, 0.5, 0.1]).is_err());
		assert!(Distribution::new([f64::NAN, 0.5, 0.5, 0.1]).is_err());
		assert!(Distribution::new([f64::INFINITY, 0.0, 0.0, 0.0]).is_err());

		let mut d = Distribution::empty();
		assert!(d.set(Nucleotide::Unknown, 1.0).is_err());
		assert!(d.set(Nucleotide::T, -1.0).is_err());
		d.set(Nucleotide::T, 2.0).unwrap();
		assert_eq!(d.weight(Nucleotide::T), 2.0);
	}
}

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{MpgError, Result};

use super::distribution::Distribution;
use super::kmer::{all_kmers, kmer_count};
use super::nucleotide::{Nucleotide, Sequence};
use super::random_source::RandomSource;

/// Transition probabilities of a k-order Markov chain.
///
/// Maps every known context (the `k` most recent bases) to the distribution
/// of the next base. Contexts are kept in canonical k-mer order, which is
/// also the row order of the diagnostic matrix.
///
/// The table may be incomplete: contexts absent from the map are treated by
/// the generator as an empty distribution.
///
/// # Invariants
/// - Every context has length `k` and contains only `A`, `C`, `G`, `T`
/// - Every weight is finite and non-negative
/// - After `normalize`, every distribution sums to 1.0
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TransitionTable {
	/// Context size (order of the chain).
	k: usize,

	/// Context -> next-base distribution.
	#[serde(deserialize_with = "unique_contexts")]
	transitions: BTreeMap<Sequence, Distribution>,
}

/// Decodes the transition map, rejecting two keys that parse to the same
/// context (`A` and `a`).
fn unique_contexts<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<BTreeMap<Sequence, Distribution>, D::Error> {
	struct ContextMap;

	impl<'de> Visitor<'de> for ContextMap {
		type Value = BTreeMap<Sequence, Distribution>;

		fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
			f.write_str("a map from contexts to weights")
		}

		fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
			let mut transitions = BTreeMap::new();
			while let Some((context, distribution)) = access.next_entry::<Sequence, Distribution>()? {
				match transitions.entry(context) {
					Entry::Vacant(slot) => {
						slot.insert(distribution);
					}
					Entry::Occupied(slot) => {
						return Err(de::Error::custom(format!("duplicate context '{}'", slot.key())));
					}
				}
			}
			Ok(transitions)
		}
	}

	deserializer.deserialize_map(ContextMap)
}

impl TransitionTable {
	/// Creates an empty table of order `k`.
	///
	/// # Errors
	/// Returns `KmerSizeTooLarge` if `4^k` overflows.
	pub fn new(k: usize) -> Result<Self> {
		kmer_count(k)?;
		Ok(Self { k, transitions: BTreeMap::new() })
	}

	/// Complete table where every base has probability 0.25.
	pub fn uniform(k: usize) -> Result<Self> {
		let mut table = Self::new(k)?;
		for context in all_kmers(k)? {
			table.transitions.insert(context, Distribution::uniform());
		}
		Ok(table)
	}

	/// Complete table with weights drawn uniformly from `[0, 1)`.
	///
	/// Contexts are visited in canonical order and each receives four draws
	/// (A, C, G, T) from a `RandomSource` seeded with `seed`, so the table
	/// is reproducible. The result is not normalized.
	pub fn random(k: usize, seed: u64) -> Result<Self> {
		let mut table = Self::new(k)?;
		let mut source = RandomSource::new(seed);
		for context in all_kmers(k)? {
			let weights = [source.next_f64(), source.next_f64(), source.next_f64(), source.next_f64()];
			table.transitions.insert(context, Distribution::new(weights)?);
		}
		Ok(table)
	}

	pub fn k(&self) -> usize {
		self.k
	}

	/// Number of contexts present.
	pub fn len(&self) -> usize {
		self.transitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.transitions.is_empty()
	}

	/// True when all `4^k` contexts are present.
	pub fn is_complete(&self) -> bool {
		kmer_count(self.k).is_ok_and(|count| count == self.transitions.len())
	}

	/// Inserts or replaces the distribution of `context`.
	///
	/// # Errors
	/// - `ContextLength` if `context` is not `k` bases long
	/// - `InvalidContext` if it contains `Unknown`
	/// - `InvalidWeight` for a negative or non-finite weight
	pub fn insert(&mut self, context: Sequence, distribution: Distribution) -> Result<Option<Distribution>> {
		self.check_context(&context)?;
		distribution.validate(&context.to_string())?;
		Ok(self.transitions.insert(context, distribution))
	}

	/// Exact-match lookup of a context.
	pub fn lookup(&self, context: &[Nucleotide]) -> Option<&Distribution> {
		self.transitions.get(context)
	}

	/// Iterates contexts in canonical order.
	pub fn iter(&self) -> impl Iterator<Item = (&Sequence, &Distribution)> {
		self.transitions.iter()
	}

	/// Normalizes every distribution so that it sums to one.
	///
	/// All rows are checked before any is modified, so a rejected table is
	/// left exactly as it was.
	///
	/// # Errors
	/// Returns `DegenerateDistribution` naming the first context whose
	/// weights sum to zero.
	pub fn normalize(&mut self) -> Result<()> {
		for (context, distribution) in &self.transitions {
			let sum = distribution.total();
			if !(sum.is_finite() && sum > 0.0) {
				return Err(MpgError::DegenerateDistribution { context: context.to_string(), sum });
			}
		}
		for (context, distribution) in self.transitions.iter_mut() {
			distribution.normalize(&context.to_string())?;
		}
		Ok(())
	}

	/// Consuming form of [`normalize`](Self::normalize).
	pub fn normalized(mut self) -> Result<Self> {
		self.normalize()?;
		Ok(self)
	}

	/// Re-checks every invariant. Used after deserialization.
	pub fn validate(&self) -> Result<()> {
		kmer_count(self.k)?;
		for (context, distribution) in &self.transitions {
			self.check_context(context)?;
			distribution.validate(&context.to_string())?;
		}
		Ok(())
	}

	fn check_context(&self, context: &Sequence) -> Result<()> {
		if context.len() != self.k {
			return Err(MpgError::ContextLength {
				context: context.to_string(),
				found: context.len(),
				expected: self.k,
			});
		}
		if context.unknown_count() > 0 {
			return Err(MpgError::InvalidContext(context.to_string()));
		}
		Ok(())
	}
}

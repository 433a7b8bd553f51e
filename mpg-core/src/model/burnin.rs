use std::sync::mpsc;
use std::thread;

use log::{debug, warn};

use crate::error::{MpgError, Result};

use super::nucleotide::Sequence;
use super::random_source::RandomSource;
use super::sampler::{Sampler, SamplingStats};
use super::transition_table::TransitionTable;
use super::uniform::extend_uniform;

/// k-order Markov chain generator with burn-in.
///
/// # Responsibilities
/// - Own a private, normalized copy of the transition table
/// - Seed each run with `k` uniform bases drawn from the run's random source
/// - Walk the chain, discard the seed context and burn-in, keep the rest
/// - Produce several independent records in parallel
///
/// A generator holds no mutable state, so one instance can serve any number
/// of runs; every run builds its own `RandomSource` from its seed.
#[derive(Debug, Clone)]
pub struct MarkovGenerator {
	table: TransitionTable,
}

impl MarkovGenerator {
	/// Takes ownership of `table` and normalizes it.
	///
	/// The caller's data is never modified: pass a clone to keep the
	/// original weights.
	///
	/// # Errors
	/// Returns `DegenerateDistribution` if any context's weights sum to zero.
	pub fn new(table: TransitionTable) -> Result<Self> {
		let table = table.normalized()?;
		if !table.is_complete() {
			warn!(
				"Transition table of order {} has {} contexts, missing contexts will produce N",
				table.k(),
				table.len()
			);
		}
		Ok(Self { table })
	}

	/// Order of the chain.
	pub fn k(&self) -> usize {
		self.table.k()
	}

	/// The normalized table driving the chain.
	pub fn table(&self) -> &TransitionTable {
		&self.table
	}

	/// Generates `length` bases after discarding `burnin` bases.
	pub fn generate(&self, length: usize, burnin: usize, seed: u64) -> Result<Sequence> {
		self.generate_with_stats(length, burnin, seed).map(|(seq, _)| seq)
	}

	/// Like [`generate`](Self::generate), also returning how many steps fell
	/// back to `Unknown`.
	///
	/// # Behavior
	/// 1. One `RandomSource` is built from `seed` and shared by every step
	/// 2. The first `k` bases are drawn uniformly from it
	/// 3. `length + burnin` bases are sampled, each from the distribution of
	///    the last `k` bases and one uniform draw
	/// 4. The first `k + burnin` bases are dropped
	///
	/// The walk is performed even when `length == 0`.
	///
	/// # Errors
	/// Returns `LengthOverflow` when `k + burnin + length` overflows or the
	/// walk cannot be allocated.
	pub fn generate_with_stats(&self, length: usize, burnin: usize, seed: u64) -> Result<(Sequence, SamplingStats)> {
		let k = self.table.k();
		let total = walk_length(k, length, burnin)?;
		debug!("Generating {} bases (k={}, burn-in={}, seed={})", length, k, burnin, seed);

		let mut source = RandomSource::new(seed);
		let mut seq = Sequence::try_with_capacity(total).ok_or(MpgError::LengthOverflow { length, burnin, k })?;
		extend_uniform(&mut source, k, &mut seq);

		let mut sampler = Sampler::new();
		for _ in 0..length + burnin {
			let context = seq.last_k(k);
			let distribution = self.table.lookup(context);
			let draw = source.next_f64();
			let next = sampler.pick(distribution, draw, &|| Sequence::from(context).to_string());
			seq.push(next);
		}

		seq.trim_prefix(k + burnin);

		let stats = sampler.stats();
		if stats.unknowns() > 0 {
			warn!(
				"Seed {}: {} of {} steps emitted N ({} missing contexts, {} sampling fallbacks)",
				seed,
				stats.unknowns(),
				stats.draws,
				stats.missing_contexts,
				stats.fallbacks
			);
		}
		Ok((seq, stats))
	}

	/// Generates `count` independent records in parallel.
	///
	/// Record `i` uses seed `seed + i` (wrapping), so the output does not
	/// depend on the number of worker threads. Records are returned in index
	/// order.
	///
	/// # Notes
	/// - Work is split in one chunk per logical CPU.
	/// - Results are collected through an MPSC channel.
	pub fn generate_many(&self, count: usize, length: usize, burnin: usize, seed: u64) -> Result<Vec<Sequence>> {
		walk_length(self.table.k(), length, burnin)?;
		if count == 0 {
			return Ok(Vec::new());
		}

		let workers = num_cpus::get().max(1);
		let chunk_size = count.div_ceil(workers);
		debug!("Generating {} records with {} workers", count, count.div_ceil(chunk_size));

		let (tx, rx) = mpsc::channel();
		thread::scope(|scope| {
			for start in (0..count).step_by(chunk_size) {
				let tx = tx.clone();
				let end = (start + chunk_size).min(count);
				scope.spawn(move || {
					for i in start..end {
						let result = self.generate(length, burnin, seed.wrapping_add(i as u64));
						// The receiver outlives the scope
						let _ = tx.send((i, result));
					}
				});
			}
		});
		drop(tx);

		let mut records: Vec<Option<Sequence>> = vec![None; count];
		for (i, result) in rx {
			records[i] = Some(result?);
		}
		Ok(records.into_iter().flatten().collect())
	}
}

/// Total bases held during a walk: seed context, burn-in and output.
fn walk_length(k: usize, length: usize, burnin: usize) -> Result<usize> {
	k.checked_add(burnin)
		.and_then(|n| n.checked_add(length))
		.ok_or(MpgError::LengthOverflow { length, burnin, k })
}

/// Generates `total_length` bases from a k-order Markov chain after a
/// discarded run of `burnin_length` bases.
///
/// `transition_table` is taken by value and normalized privately.
///
/// # Errors
/// - `ContextSizeMismatch` if `k` differs from the table's order
/// - `DegenerateDistribution` if a context's weights sum to zero
/// - `LengthOverflow` if the walk length is not representable
///
/// # Examples
/// ```
/// use mpg_core::{mpg_burnin, TransitionTable};
///
/// let table = TransitionTable::uniform(1).unwrap();
/// let seq = mpg_burnin(10, 1, table, 0, 1).unwrap();
/// assert_eq!(seq.len(), 10);
/// ```
pub fn mpg_burnin(
	total_length: usize,
	k: usize,
	transition_table: TransitionTable,
	burnin_length: usize,
	seed: u64,
) -> Result<Sequence> {
	if transition_table.k() != k {
		return Err(MpgError::ContextSizeMismatch { table: transition_table.k(), requested: k });
	}
	MarkovGenerator::new(transition_table)?.generate(total_length, burnin_length, seed)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::distribution::Distribution;
	use crate::model::nucleotide::Nucleotide;
	use crate::model::uniform::random_dna;

	fn deterministic_cycle() -> TransitionTable {
		// A -> C -> G -> T -> A with probability one
		let mut table = TransitionTable::new(1).unwrap();
		let rows = [("A", [0.0, 1.0, 0.0, 0.0]), ("C", [0.0, 0.0, 2.0, 0.0]), ("G", [0.0, 0.0, 0.0, 5.0]), ("T", [3.0, 0.0, 0.0, 0.0])];
		for (context, weights) in rows {
			table.insert(context.parse().unwrap(), Distribution::new(weights).unwrap()).unwrap();
		}
		table
	}

	#[test]
	fn test_uniform_table_scenario() {
		let seq = mpg_burnin(10, 1, TransitionTable::uniform(1).unwrap(), 0, 1).unwrap();
		assert_eq!(seq.len(), 10);
		assert_eq!(seq.unknown_count(), 0);
	}

	#[test]
	fn test_length_invariant() {
		for k in 0..=3 {
			for burnin in [0, 1, 17, 100] {
				for length in [0, 1, 50] {
					let table = TransitionTable::random(k, 123).unwrap();
					assert_eq!(mpg_burnin(length, k, table, burnin, 4).unwrap().len(), length);
				}
			}
		}
	}

	#[test]
	fn test_deterministic() {
		let table = TransitionTable::random(2, 123).unwrap();
		let a = mpg_burnin(200, 2, table.clone(), 50, 9).unwrap();
		let b = mpg_burnin(200, 2, table, 50, 9).unwrap();
		assert_eq!(a, b);
	}

	#[test]
	fn test_seed_context_comes_from_shared_stream() {
		// The chain is deterministic, so the output only depends on the first
		// uniform base, which must equal random_dna(1, seed).
		let generator = MarkovGenerator::new(deterministic_cycle()).unwrap();
		let first = random_dna(1, 77).unwrap()[0].index().unwrap();
		let seq = generator.generate(8, 0, 77).unwrap();
		for (i, n) in seq.iter().enumerate() {
			assert_eq!(n.index(), Some((first + 1 + i) % 4));
		}
	}

	#[test]
	fn test_burnin_is_discarded() {
		let generator = MarkovGenerator::new(deterministic_cycle()).unwrap();
		let without = generator.generate(12, 0, 3).unwrap();
		let with = generator.generate(8, 4, 3).unwrap();
		assert_eq!(&without[4..], &with[..]);
	}

	#[test]
	fn test_zero_length_still_succeeds() {
		let generator = MarkovGenerator::new(TransitionTable::uniform(2).unwrap()).unwrap();
		let (seq, stats) = generator.generate_with_stats(0, 10, 1).unwrap();
		assert!(seq.is_empty());
		assert_eq!(stats.draws, 10);
	}

	#[test]
	fn test_k_zero() {
		let mut table = TransitionTable::new(0).unwrap();
		table.insert(Sequence::new(), Distribution::new([0.0, 0.0, 0.0, 1.0]).unwrap()).unwrap();
		let seq = mpg_burnin(5, 0, table, 3, 1).unwrap();
		assert_eq!(seq.to_string(), "TTTTT");
	}

	#[test]
	fn test_context_size_mismatch() {
		let err = mpg_burnin(10, 2, TransitionTable::uniform(1).unwrap(), 0, 1).unwrap_err();
		assert!(matches!(err, MpgError::ContextSizeMismatch { table: 1, requested: 2 }));
	}

	#[test]
	fn test_degenerate_table_is_rejected() {
		let mut table = TransitionTable::uniform(1).unwrap();
		table.insert("C".parse().unwrap(), Distribution::empty()).unwrap();
		assert!(matches!(
			mpg_burnin(10, 1, table, 0, 1),
			Err(MpgError::DegenerateDistribution { .. })
		));
	}

	#[test]
	fn test_length_overflow() {
		let generator = MarkovGenerator::new(TransitionTable::uniform(1).unwrap()).unwrap();
		assert!(matches!(
			generator.generate(usize::MAX, 1, 1),
			Err(MpgError::LengthOverflow { .. })
		));
	}

	#[test]
	fn test_unallocatable_walk_is_an_error() {
		let generator = MarkovGenerator::new(TransitionTable::uniform(1).unwrap()).unwrap();
		assert!(matches!(
			generator.generate(usize::MAX - 10, 0, 1),
			Err(MpgError::LengthOverflow { length, burnin: 0, k: 1 }) if length == usize::MAX - 10
		));
		assert!(generator.generate_many(4, usize::MAX - 10, 0, 1).is_err());
	}

	#[test]
	fn test_missing_contexts_degrade_to_unknown() {
		// Only 'A' is known and it always emits 'C', which has no row.
		let mut table = TransitionTable::new(1).unwrap();
		table.insert("A".parse().unwrap(), Distribution::new([0.0, 1.0, 0.0, 0.0]).unwrap()).unwrap();
		let generator = MarkovGenerator::new(table).unwrap();

		let (seq, stats) = generator.generate_with_stats(20, 0, 5).unwrap();
		assert_eq!(seq.len(), 20);
		assert!(stats.missing_contexts > 0);
		assert_eq!(stats.fallbacks, 0);
		assert_eq!(seq.unknown_count(), stats.unknowns());
		assert_eq!(seq[seq.len() - 1], Nucleotide::Unknown);
	}

	#[test]
	fn test_caller_table_is_untouched() {
		let table = TransitionTable::random(1, 123).unwrap();
		let original = table.clone();
		let generator = MarkovGenerator::new(table.clone()).unwrap();
		assert_eq!(table, original);
		assert_ne!(generator.table(), &original);
	}

	#[test]
	fn test_generate_many_matches_sequential() {
		let generator = MarkovGenerator::new(TransitionTable::random(2, 1).unwrap()).unwrap();
		let records = generator.generate_many(13, 30, 10, 100).unwrap();
		assert_eq!(records.len(), 13);
		for (i, record) in records.iter().enumerate() {
			assert_eq!(record, &generator.generate(30, 10, 100 + i as u64).unwrap());
		}
		assert!(generator.generate_many(0, 30, 10, 100).unwrap().is_empty());
	}
}

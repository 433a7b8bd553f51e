use crate::error::{MpgError, Result};

use super::nucleotide::{Nucleotide, Sequence};
use super::random_source::RandomSource;

/// Nucleotides extracted from one 64-bit word.
const BASES_PER_WORD: usize = 32;

/// Generates `length` uniformly random nucleotides from `seed`.
///
/// Each 64-bit word of the source supplies up to 32 bases, consumed two
/// bits at a time starting from the least significant bits. Words are only
/// drawn while bases are still needed, and the unused tail of the last word
/// is discarded.
///
/// # Errors
/// Returns `LengthOverflow` when `length` bases cannot be allocated.
///
/// # Examples
/// ```
/// let a = mpg_core::random_dna(16, 1).unwrap();
/// let b = mpg_core::random_dna(16, 1).unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 16);
/// ```
pub fn random_dna(length: usize, seed: u64) -> Result<Sequence> {
	let mut seq = Sequence::try_with_capacity(length).ok_or(MpgError::LengthOverflow { length, burnin: 0, k: 0 })?;
	let mut source = RandomSource::new(seed);
	extend_uniform(&mut source, length, &mut seq);
	Ok(seq)
}

/// Appends `length` uniform nucleotides drawn from an existing source.
///
/// Used by the Markov generator so that the initial context and the walk
/// share a single random stream.
pub fn extend_uniform(source: &mut RandomSource, length: usize, seq: &mut Sequence) {
	let mut remaining = length;
	while remaining > 0 {
		let word = source.next_u64();
		let take = remaining.min(BASES_PER_WORD);
		for j in 0..take {
			seq.push(Nucleotide::from_bits(word >> (2 * j)));
		}
		remaining -= take;
	}
}

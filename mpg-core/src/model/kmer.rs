use crate::error::{MpgError, Result};

use super::nucleotide::{Nucleotide, Sequence};

/// Largest `k` for which `4^k` fits in `usize`.
pub const MAX_K: usize = (usize::BITS / 2 - 1) as usize;

/// Largest `k` whose full enumeration fits in a single `Vec<Sequence>`.
pub const MAX_ENUMERABLE_K: usize = {
	let limit = isize::MAX as usize / size_of::<Sequence>();
	let mut k = 0;
	while k < MAX_K && 4usize.pow(k as u32 + 1) <= limit {
		k += 1;
	}
	k
};

/// Returns `4^k`, or an error when it does not fit in `usize`.
pub fn kmer_count(k: usize) -> Result<usize> {
	u32::try_from(k)
		.ok()
		.and_then(|exp| 4usize.checked_pow(exp))
		.ok_or(MpgError::KmerSizeTooLarge { k, max: MAX_K })
}

/// Decodes the `index`-th k-mer: position `p` holds the base whose index is
/// `(index >> (2 * (k - 1 - p))) & 3`.
///
/// Digits beyond the width of `usize` are zero, so for `k > MAX_K` the
/// leading positions are `A`.
pub fn kmer_from_index(index: usize, k: usize) -> Sequence {
	(0..k)
		.map(|p| {
			let digit = (k - 1 - p)
				.checked_mul(2)
				.and_then(|shift| u32::try_from(shift).ok())
				.and_then(|shift| index.checked_shr(shift))
				.unwrap_or(0);
			Nucleotide::from_bits(digit as u64)
		})
		.collect()
}

/// Inverse of [`kmer_from_index`]. `None` if the slice contains `Unknown`
/// or is longer than [`MAX_K`].
pub fn kmer_index(kmer: &[Nucleotide]) -> Option<usize> {
	if kmer.len() > MAX_K {
		return None;
	}
	kmer.iter()
		.try_fold(0usize, |acc, n| n.index().map(|i| (acc << 2) | i))
}

/// All `4^k` k-mers in canonical base-4 order (`AA, AC, AG, AT, CA, ...`).
///
/// `k == 0` yields a single empty sequence.
///
/// # Errors
/// Returns `KmerSizeTooLarge` when `4^k` overflows or the k-mers cannot be
/// allocated. Nothing is generated in that case.
pub fn all_kmers(k: usize) -> Result<Vec<Sequence>> {
	let count = kmer_count(k)?;
	let too_large = MpgError::KmerSizeTooLarge { k, max: MAX_ENUMERABLE_K };
	if k > MAX_ENUMERABLE_K {
		return Err(too_large);
	}
	let mut kmers = Vec::new();
	if kmers.try_reserve_exact(count).is_err() {
		return Err(too_large);
	}
	kmers.extend((0..count).map(|i| kmer_from_index(i, k)));
	Ok(kmers)
}

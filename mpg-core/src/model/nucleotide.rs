use std::borrow::Borrow;
use std::fmt::{self, Write};
use std::ops::Deref;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::MpgError;

/// A DNA nucleotide.
///
/// The four bases map to the stable indices A=0, C=1, G=2, T=3, which drive
/// k-mer enumeration order and the order in which distributions are scanned.
///
/// `Unknown` is not part of the alphabet. It is only produced by the sampler
/// when a distribution is missing or its cumulative mass never exceeds the
/// draw, and is rendered as `N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Nucleotide {
	A = 0,
	C = 1,
	G = 2,
	T = 3,
	Unknown = 4,
}

/// The alphabet in canonical order.
pub const ALPHABET: [Nucleotide; 4] = [Nucleotide::A, Nucleotide::C, Nucleotide::G, Nucleotide::T];

impl Nucleotide {
	/// Converts a 2-bit index (0-3) into a base.
	#[inline(always)]
	pub const fn from_index(idx: u8) -> Option<Self> {
		match idx {
			0 => Some(Self::A),
			1 => Some(Self::C),
			2 => Some(Self::G),
			3 => Some(Self::T),
			_ => None,
		}
	}

	/// Converts the low 2 bits of `bits` into a base. Never yields `Unknown`.
	#[inline(always)]
	pub const fn from_bits(bits: u64) -> Self {
		ALPHABET[(bits & 0x3) as usize]
	}

	/// Index in the alphabet, or `None` for `Unknown`.
	#[inline(always)]
	pub const fn index(self) -> Option<usize> {
		match self {
			Self::Unknown => None,
			other => Some(other as usize),
		}
	}

	/// Accepts upper and lowercase `ACGT`; anything else is `None`.
	#[inline]
	pub const fn from_ascii(byte: u8) -> Option<Self> {
		match byte {
			b'A' | b'a' => Some(Self::A),
			b'C' | b'c' => Some(Self::C),
			b'G' | b'g' => Some(Self::G),
			b'T' | b't' => Some(Self::T),
			_ => None,
		}
	}

	#[inline(always)]
	pub const fn to_char(self) -> char {
		match self {
			Self::A => 'A',
			Self::C => 'C',
			Self::G => 'G',
			Self::T => 'T',
			Self::Unknown => 'N',
		}
	}

	#[inline(always)]
	pub const fn is_known(self) -> bool {
		!matches!(self, Self::Unknown)
	}
}

impl fmt::Display for Nucleotide {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_char(self.to_char())
	}
}

/// An ordered, growable run of nucleotides.
///
/// Generation appends one base at a time and finally drops a prefix.
/// Sequences compare lexicographically in alphabet order, so for a fixed
/// length the ordering matches base-4 k-mer enumeration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sequence(Vec<Nucleotide>);

impl Sequence {
	pub fn new() -> Self {
		Self(Vec::new())
	}

	/// Empty sequence with room for `capacity` bases, or `None` when that
	/// allocation cannot be made.
	pub fn try_with_capacity(capacity: usize) -> Option<Self> {
		let mut bases = Vec::new();
		bases.try_reserve_exact(capacity).ok()?;
		Some(Self(bases))
	}

	pub fn push(&mut self, nucleotide: Nucleotide) {
		self.0.push(nucleotide);
	}

	/// Returns the last `k` bases (the whole sequence if shorter).
	pub fn last_k(&self, k: usize) -> &[Nucleotide] {
		&self.0[self.0.len().saturating_sub(k)..]
	}

	/// Drops the first `n` bases in place.
	pub fn trim_prefix(&mut self, n: usize) {
		let n = n.min(self.0.len());
		self.0.drain(..n);
	}

	/// Truncates to at most `len` bases.
	pub fn truncate(&mut self, len: usize) {
		self.0.truncate(len);
	}

	/// Number of `Unknown` bases.
	pub fn unknown_count(&self) -> usize {
		self.0.iter().filter(|n| !n.is_known()).count()
	}

	pub fn into_inner(self) -> Vec<Nucleotide> {
		self.0
	}
}

impl Deref for Sequence {
	type Target = [Nucleotide];

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl Borrow<[Nucleotide]> for Sequence {
	fn borrow(&self) -> &[Nucleotide] {
		&self.0
	}
}

impl From<Vec<Nucleotide>> for Sequence {
	fn from(bases: Vec<Nucleotide>) -> Self {
		Self(bases)
	}
}

impl From<&[Nucleotide]> for Sequence {
	fn from(bases: &[Nucleotide]) -> Self {
		Self(bases.to_vec())
	}
}

impl FromIterator<Nucleotide> for Sequence {
	fn from_iter<I: IntoIterator<Item = Nucleotide>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

impl fmt::Display for Sequence {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for nucleotide in &self.0 {
			f.write_char(nucleotide.to_char())?;
		}
		Ok(())
	}
}

/// Parses a context string. Only `ACGT` (any case) is accepted; `N` is
/// rejected because `Unknown` never appears in a transition table.
impl FromStr for Sequence {
	type Err = MpgError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		s.bytes()
			.map(Nucleotide::from_ascii)
			.collect::<Option<Vec<_>>>()
			.map(Self)
			.ok_or_else(|| MpgError::InvalidContext(s.to_owned()))
	}
}

impl Serialize for Sequence {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for Sequence {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let s = String::deserialize(deserializer)?;
		s.parse().map_err(serde::de::Error::custom)
	}
}

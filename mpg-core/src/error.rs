use thiserror::Error;

use crate::model::nucleotide::Nucleotide;

/// Errors raised by table construction, normalization and generation.
///
/// Every variant is fatal for the call that produced it. Recoverable
/// conditions (missing contexts, sampling fallbacks) are not errors and are
/// reported through `SamplingStats` instead.
#[derive(Debug, Error)]
pub enum MpgError {
	/// `4^k` does not fit in `usize`, or the k-mers cannot all be held in
	/// memory.
	#[error("k-mer size {k} is too large (maximum is {max})")]
	KmerSizeTooLarge { k: usize, max: usize },

	/// `k + burnin + length` is not representable, or that many bases cannot
	/// be allocated.
	#[error("requested length is too large: length={length}, burnin={burnin}, k={k}")]
	LengthOverflow { length: usize, burnin: usize, k: usize },

	/// Every weight of a context is zero, so it cannot be normalized.
	#[error("degenerate distribution for context '{context}': weights sum to {sum}")]
	DegenerateDistribution { context: String, sum: f64 },

	/// A weight is negative, NaN or infinite.
	#[error("invalid weight {weight} for {nucleotide} in context '{context}'")]
	InvalidWeight { context: String, nucleotide: Nucleotide, weight: f64 },

	/// A context does not have the table's length.
	#[error("context '{context}' has length {found}, expected {expected}")]
	ContextLength { context: String, found: usize, expected: usize },

	/// The caller's `k` differs from the table's context size.
	#[error("table has context size {table}, but k={requested} was requested")]
	ContextSizeMismatch { table: usize, requested: usize },

	/// A context string contains something other than A, C, G or T.
	#[error("invalid context '{0}': only A, C, G and T are allowed")]
	InvalidContext(String),

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("failed to parse table file: {0}")]
	TomlDecode(#[from] toml::de::Error),

	#[error("failed to write table file: {0}")]
	TomlEncode(#[from] toml::ser::Error),

	#[error("binary table error: {0}")]
	Postcard(#[from] postcard::Error),
}

pub type Result<T> = std::result::Result<T, MpgError>;

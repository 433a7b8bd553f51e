//! Top-level module for sequence generation.
//!
//! Components, from leaf to root:
//! - Alphabet and sequence types (`Nucleotide`, `Sequence`)
//! - Deterministic random source (`RandomSource`)
//! - Uniform generator and k-mer enumeration
//! - Transition probabilities (`Distribution`, `TransitionTable`)
//! - Weighted sampling (`Sampler`)
//! - The burn-in Markov generator (`MarkovGenerator`)

/// Fixed nucleotide alphabet and the growable `Sequence` type.
pub mod nucleotide;

/// Seeded pseudo-random source shared by both generation modes.
pub mod random_source;

/// Uniform random sequences, two bits of entropy per nucleotide.
pub mod uniform;

/// Enumeration and indexing of k-mers in base-4 order.
pub mod kmer;

/// Probability mass over the next nucleotide, in alphabet order.
pub mod distribution;

/// Mapping from a k-length context to its `Distribution`.
pub mod transition_table;

/// Ordered cumulative-scan sampling with fallback accounting.
pub mod sampler;

/// Markov chain generation with burn-in and trimming.
pub mod burnin;

//! Synthetic DNA generation library.
//!
//! This crate provides the building blocks used to produce test fixtures
//! for genomics tools:
//! - Uniform random nucleotide sequences from a seeded source
//! - Enumeration of every k-mer in canonical base-4 order
//! - k-order Markov chain generation with a discarded burn-in run
//! - Transition table persistence and text output (FASTA, matrix)
//!
//! The three entry points used by front-ends are re-exported at the crate
//! root: [`random_dna`], [`all_kmers`] and [`mpg_burnin`].

/// Nucleotides, sequences, random source and the Markov chain generator.
pub mod model;

/// Crate-wide error type.
pub mod error;

/// Transition table files and directory helpers.
pub mod io;

/// FASTA and transition matrix writers.
pub mod format;

pub use error::{MpgError, Result};
pub use model::burnin::{mpg_burnin, MarkovGenerator};
pub use model::kmer::all_kmers;
pub use model::nucleotide::{Nucleotide, Sequence, ALPHABET};
pub use model::random_source::RandomSource;
pub use model::transition_table::TransitionTable;
pub use model::uniform::random_dna;

use clap::{Args, Parser, Subcommand};
use mpg_core::format::DEFAULT_LINE_WIDTH;
use std::path::PathBuf;

/// mpg: synthetic DNA for testing genomics tools.
///
/// Sequences are written to stdout as FASTA. Diagnostics go to stderr.
#[derive(Parser, Debug)]
#[command(name = "mpg")]
#[command(version, about = "Generates synthetic DNA sequences", long_about = None)]
pub struct Cli {
	/// Increase log verbosity (-v info, -vv debug, -vvv trace)
	#[arg(short, long, action = clap::ArgAction::Count, global = true)]
	pub verbose: u8,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Uniform random sequence (2 random bits per base).
	Random {
		/// Sequence length
		#[arg(short, long, default_value = "128")]
		length: usize,

		/// Random seed
		#[arg(short, long, default_value = "1")]
		seed: u64,

		#[command(flatten)]
		output: OutputArgs,
	},

	/// List every k-mer in canonical order, one per line.
	Kmers {
		/// k-mer size
		#[arg(short, default_value = "2")]
		k: usize,
	},

	/// k-order Markov chain sequence with burn-in.
	Markov(Box<MarkovArgs>),
}

#[derive(Args, Debug)]
pub struct MarkovArgs {
	/// Length of the retained sequence
	#[arg(short, long, default_value = "128")]
	pub length: usize,

	/// Markov order (context size)
	#[arg(short, default_value = "1")]
	pub k: usize,

	/// Bases generated and discarded before output is kept
	#[arg(short, long, default_value = "1000")]
	pub burnin: usize,

	/// Random seed for the walk
	#[arg(short, long, default_value = "1")]
	pub seed: u64,

	/// Transition table file (.toml or .bin). Its order must match -k
	#[arg(short, long, conflicts_with = "table_seed")]
	pub table: Option<PathBuf>,

	/// Seed used to synthesize a random transition table when no file is given
	#[arg(long, default_value = "123")]
	pub table_seed: u64,

	/// Write the normalized transition matrix to stderr
	#[arg(long)]
	pub print_matrix: bool,

	/// Save the transition table (before normalization) to this file
	#[arg(long)]
	pub dump: Option<PathBuf>,

	#[command(flatten)]
	pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct OutputArgs {
	/// FASTA record name
	#[arg(short, long, default_value = "1")]
	pub name: String,

	/// Number of records; record i uses seed + i
	#[arg(short, long, default_value = "1")]
	pub count: usize,

	/// FASTA line width (0 for a single line)
	#[arg(short = 'w', long, default_value_t = DEFAULT_LINE_WIDTH)]
	pub line_width: usize,
}

impl OutputArgs {
	/// Name of record `index` (`name` alone when a single record is written).
	pub fn record_name(&self, index: usize) -> String {
		if self.count == 1 {
			self.name.clone()
		} else {
			format!("{}_{}", self.name, index + 1)
		}
	}
}

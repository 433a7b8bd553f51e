mod args;

use std::io::{self, BufWriter, Write};

use clap::Parser;
use log::{debug, info};
use mpg_core::format::{write_fasta, write_matrix};
use mpg_core::io::{load_table, save_table};
use mpg_core::{all_kmers, random_dna, MarkovGenerator, MpgError, TransitionTable};

use args::{Cli, Commands, MarkovArgs, OutputArgs};

fn main() -> Result<(), Box<dyn std::error::Error>> {
	let cli = Cli::parse();

	let level = match cli.verbose {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	};
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

	let stdout = io::stdout();
	let mut out = BufWriter::new(stdout.lock());
	match cli.command {
		Commands::Random { length, seed, output } => random(&mut out, length, seed, &output)?,
		Commands::Kmers { k } => kmers(&mut out, k)?,
		Commands::Markov(args) => markov(&mut out, &args)?,
	}
	out.flush()?;
	Ok(())
}

fn random<W: Write>(out: &mut W, length: usize, seed: u64, output: &OutputArgs) -> Result<(), Box<dyn std::error::Error>> {
	info!("Generating {} uniform record(s) of {} bases", output.count, length);
	for i in 0..output.count {
		let seq = random_dna(length, seed.wrapping_add(i as u64))?;
		write_fasta(out, &output.record_name(i), &seq, output.line_width)?;
	}
	Ok(())
}

fn kmers<W: Write>(out: &mut W, k: usize) -> Result<(), Box<dyn std::error::Error>> {
	for kmer in all_kmers(k)? {
		writeln!(out, "{}", kmer)?;
	}
	Ok(())
}

fn markov<W: Write>(out: &mut W, args: &MarkovArgs) -> Result<(), Box<dyn std::error::Error>> {
	let table = match &args.table {
		Some(path) => {
			info!("Loading transition table from {}", path.display());
			load_table(path)?
		}
		None => {
			info!("Synthesizing random transition table (k={}, seed={})", args.k, args.table_seed);
			TransitionTable::random(args.k, args.table_seed)?
		}
	};
	if table.k() != args.k {
		return Err(MpgError::ContextSizeMismatch { table: table.k(), requested: args.k }.into());
	}

	if let Some(path) = &args.dump {
		info!("Saving transition table to {}", path.display());
		save_table(&table, path)?;
	}

	let generator = MarkovGenerator::new(table)?;
	if args.print_matrix {
		let stderr = io::stderr();
		write_matrix(&mut stderr.lock(), generator.table())?;
	}

	let output = &args.output;
	debug!("Generating {} record(s), burn-in {}", output.count, args.burnin);
	let records = generator.generate_many(output.count, args.length, args.burnin, args.seed)?;
	for (i, seq) in records.iter().enumerate() {
		write_fasta(out, &output.record_name(i), seq, output.line_width)?;
	}
	Ok(())
}

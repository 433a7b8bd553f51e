use std::io::{self, Write};

use crate::model::nucleotide::{Sequence, ALPHABET};
use crate::model::transition_table::TransitionTable;

/// Default FASTA line width.
pub const DEFAULT_LINE_WIDTH: usize = 80;

/// Writes one FASTA record: `>name` then the sequence wrapped at
/// `line_width` columns. A width of 0 keeps the sequence on one line.
///
/// An empty sequence still gets its header and an empty line.
pub fn write_fasta<W: Write>(writer: &mut W, name: &str, seq: &Sequence, line_width: usize) -> io::Result<()> {
	writeln!(writer, ">{}", name)?;
	let text = seq.to_string();
	if text.is_empty() || line_width == 0 {
		return writeln!(writer, "{}", text);
	}
	for line in text.as_bytes().chunks(line_width) {
		writer.write_all(line)?;
		writer.write_all(b"\n")?;
	}
	Ok(())
}

/// FASTA record as a `String`.
pub fn fasta_string(name: &str, seq: &Sequence, line_width: usize) -> String {
	let mut buffer = Vec::new();
	// Writing into a Vec cannot fail and the content is ASCII
	let _ = write_fasta(&mut buffer, name, seq, line_width);
	String::from_utf8_lossy(&buffer).into_owned()
}

/// Writes the transition table as a tab-separated matrix.
///
/// The header row is `\tA\tC\tG\tT`; every following row is a context in
/// canonical order followed by its four probabilities.
pub fn write_matrix<W: Write>(writer: &mut W, table: &TransitionTable) -> io::Result<()> {
	for nucleotide in ALPHABET {
		write!(writer, "\t{}", nucleotide)?;
	}
	writeln!(writer)?;
	for (context, distribution) in table.iter() {
		write!(writer, "{}", context)?;
		for (_, weight) in distribution.iter() {
			write!(writer, "\t{}", weight)?;
		}
		writeln!(writer)?;
	}
	Ok(())
}

use std::fs;
use std::path::Path;

use log::debug;

use crate::error::Result;
use crate::model::transition_table::TransitionTable;

/// Extension of the compact binary table format.
pub const BINARY_EXTENSION: &str = "bin";

/// Extension of the human-editable table format.
pub const TEXT_EXTENSION: &str = "toml";

/// Loads a transition table from disk.
///
/// - `.bin` files are decoded with `postcard`
/// - anything else is parsed as TOML:
///
/// ```toml
/// k = 1
///
/// [transitions]
/// A = [0.1, 0.4, 0.4, 0.1]
/// C = [0.4, 0.1, 0.1, 0.4]
/// ```
///
/// The table is validated after decoding. It is not normalized.
pub fn load_table<P: AsRef<Path>>(path: P) -> Result<TransitionTable> {
	let path = path.as_ref();
	let table: TransitionTable = if is_binary(path) {
		postcard::from_bytes(&fs::read(path)?)?
	} else {
		toml::from_str(&fs::read_to_string(path)?)?
	};
	table.validate()?;
	debug!("Loaded table of order {} with {} contexts from {}", table.k(), table.len(), path.display());
	Ok(table)
}

/// Saves a transition table, choosing the format from the extension like
/// [`load_table`].
pub fn save_table<P: AsRef<Path>>(table: &TransitionTable, path: P) -> Result<()> {
	let path = path.as_ref();
	if is_binary(path) {
		fs::write(path, postcard::to_stdvec(table)?)?;
	} else {
		fs::write(path, toml::to_string(table)?)?;
	}
	debug!("Saved table of order {} to {}", table.k(), path.display());
	Ok(())
}

fn is_binary(path: &Path) -> bool {
	path.extension().is_some_and(|ext| ext == BINARY_EXTENSION)
}

/// Extracts the base filename without extension.
///
/// Examples:
/// - `"./data/cpg.toml"` → `"cpg"`
/// - `"cpg.bin"` → `"cpg"`
pub fn get_filename<P: AsRef<Path>>(input_path: P) -> std::io::Result<String> {
	let stem = input_path
		.as_ref()
		.file_stem()
		.ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "Path has no filename"))?;

	Ok(stem.to_string_lossy().to_string())
}

/// Lists table files (`.toml` or `.bin`) directly inside `dir`.
///
/// Returns file names only (no paths), sorted.
pub fn list_tables<P: AsRef<Path>>(dir: P) -> std::io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		let is_table = path
			.extension()
			.is_some_and(|ext| ext == TEXT_EXTENSION || ext == BINARY_EXTENSION);
		if path.is_file() && is_table {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}

	files.sort();
	Ok(files)
}

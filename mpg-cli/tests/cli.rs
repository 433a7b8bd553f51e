use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn mpg() -> Command {
	Command::cargo_bin("mpg").unwrap()
}

fn fasta_body(stdout: &[u8]) -> String {
	String::from_utf8_lossy(stdout)
		.lines()
		.filter(|line| !line.starts_with('>'))
		.collect()
}

#[test]
fn test_random_fixture() {
	mpg().args(["random", "--length", "8", "--seed", "1"])
		.assert()
		.success()
		.stdout(">1\nCCATAACA\n");
}

#[test]
fn test_random_wraps_lines() {
	let output = mpg().args(["random", "-l", "200", "-w", "80"]).output().unwrap();
	assert!(output.status.success());
	let text = String::from_utf8(output.stdout).unwrap();
	let lengths: Vec<usize> = text.lines().skip(1).map(str::len).collect();
	assert_eq!(lengths, vec![80, 80, 40]);
}

#[test]
fn test_random_unallocatable_length() {
	let length = usize::MAX.to_string();
	mpg().args(["random", "-l", length.as_str()])
		.assert()
		.failure()
		.stderr(predicate::str::contains("LengthOverflow"));
}

#[test]
fn test_kmers_order() {
	let output = mpg().args(["kmers", "-k", "2"]).output().unwrap();
	assert!(output.status.success());
	let text = String::from_utf8(output.stdout).unwrap();
	let kmers: Vec<&str> = text.lines().collect();
	assert_eq!(kmers.len(), 16);
	assert_eq!(&kmers[..5], &["AA", "AC", "AG", "AT", "CA"]);
}

#[test]
fn test_kmers_too_large() {
	mpg().args(["kmers", "-k", "40"]).assert().failure();
	mpg().args(["kmers", "-k", "30"])
		.assert()
		.failure()
		.stderr(predicate::str::contains("KmerSizeTooLarge"));
}

#[test]
fn test_markov_defaults() {
	let output = mpg().arg("markov").output().unwrap();
	assert!(output.status.success());
	assert!(output.stdout.starts_with(b">1\n"));
	let body = fasta_body(&output.stdout);
	assert_eq!(body.len(), 128);
	assert!(body.chars().all(|c| "ACGT".contains(c)));
}

#[test]
fn test_markov_is_reproducible() {
	let args = ["markov", "-l", "300", "-k", "2", "-b", "50", "-s", "9"];
	let a = mpg().args(args).output().unwrap();
	let b = mpg().args(args).output().unwrap();
	assert_eq!(a.stdout, b.stdout);
}

#[test]
fn test_markov_print_matrix() {
	mpg().args(["markov", "-l", "10", "--print-matrix"])
		.assert()
		.success()
		.stderr(predicate::str::contains("\tA\tC\tG\tT\n"))
		.stderr(predicate::str::contains("\nT\t"));
}

#[test]
fn test_markov_multiple_records() {
	let output = mpg().args(["markov", "-l", "20", "-c", "3", "-n", "sim"]).output().unwrap();
	assert!(output.status.success());
	let text = String::from_utf8(output.stdout).unwrap();
	let headers: Vec<&str> = text.lines().filter(|l| l.starts_with('>')).collect();
	assert_eq!(headers, vec![">sim_1", ">sim_2", ">sim_3"]);
}

#[test]
fn test_markov_dump_and_reload() {
	let dir = tempdir().unwrap();
	let path = dir.path().join("table.toml");

	let generated = mpg()
		.args(["markov", "-l", "64", "-k", "2", "--table-seed", "7", "--dump"])
		.arg(&path)
		.output()
		.unwrap();
	assert!(generated.status.success());
	assert!(path.exists());

	let reloaded = mpg().args(["markov", "-l", "64", "-k", "2", "--table"]).arg(&path).output().unwrap();
	assert!(reloaded.status.success());
	assert_eq!(generated.stdout, reloaded.stdout);
}

#[test]
fn test_markov_table_order_mismatch() {
	let dir = tempdir().unwrap();
	let path = dir.path().join("k1.toml");
	std::fs::write(&path, "k = 1\n[transitions]\nA = [1, 1, 1, 1]\n").unwrap();

	mpg().args(["markov", "-k", "2", "--table"])
		.arg(&path)
		.assert()
		.failure()
		.stderr(predicate::str::contains("ContextSizeMismatch"));
}

#[test]
fn test_markov_degenerate_table() {
	let dir = tempdir().unwrap();
	let path = dir.path().join("zero.toml");
	std::fs::write(&path, "k = 1\n[transitions]\nA = [1, 1, 1, 1]\nC = [0, 0, 0, 0]\n").unwrap();

	mpg().args(["markov", "--table"])
		.arg(&path)
		.assert()
		.failure()
		.stderr(predicate::str::contains("DegenerateDistribution"));
}

#[test]
fn test_markov_incomplete_table_emits_unknown() {
	let dir = tempdir().unwrap();
	let path = dir.path().join("partial.toml");
	std::fs::write(&path, "k = 1\n[transitions]\nA = [0, 1, 0, 0]\n").unwrap();

	let output = mpg().args(["markov", "-l", "10", "-b", "0", "--table"]).arg(&path).output().unwrap();
	assert!(output.status.success());
	assert!(fasta_body(&output.stdout).ends_with('N'));
}

#[test]
fn test_markov_bundled_table() {
	let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../data/alternating.toml");
	mpg().args(["markov", "-l", "40", "--print-matrix", "--table"])
		.arg(&path)
		.assert()
		.success()
		.stdout(predicate::str::starts_with(">1\n"))
		.stderr(predicate::str::contains("A\t0.1\t0.4\t0.4\t0.1"));
}

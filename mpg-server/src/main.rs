use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use actix_cors::Cors;
use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use log::{info, warn};
use serde::Deserialize;

use mpg_core::format::{fasta_string, write_matrix, DEFAULT_LINE_WIDTH};
use mpg_core::io::{get_filename, list_tables, load_table, BINARY_EXTENSION, TEXT_EXTENSION};
use mpg_core::{all_kmers, random_dna, MarkovGenerator, Sequence, TransitionTable};

/// HTTP front-end for mpg.
#[derive(Parser, Debug)]
#[command(name = "mpg-server", version, about = "Serves synthetic DNA over HTTP")]
struct Config {
	/// Address to bind
	#[arg(long, default_value = "127.0.0.1")]
	host: String,

	/// Port to bind
	#[arg(short, long, default_value = "5000")]
	port: u16,

	/// Directory holding transition table files
	#[arg(short, long, default_value = "./data")]
	data: PathBuf,
}

/// Query parameters of `/v1/random`.
#[derive(Deserialize)]
struct RandomParams {
	length: Option<usize>,
	seed: Option<u64>,
	name: Option<String>,
	line_width: Option<usize>,
}

/// Query parameters of `/v1/markov`.
#[derive(Deserialize)]
struct MarkovParams {
	length: Option<usize>,
	seed: Option<u64>,
	name: Option<String>,
	line_width: Option<usize>,
	k: Option<usize>,
	burnin: Option<usize>,
	table_seed: Option<u64>, // -> random table of order k, otherwise the loaded table
}

#[derive(Deserialize)]
struct KmerParams {
	k: Option<usize>,
}

#[derive(Deserialize)]
struct TableQuery {
	name: Option<String>,
}

struct SharedData {
	data_dir: PathBuf,
	table_name: Option<String>,
	generator: Option<Arc<MarkovGenerator>>,
}

/// Returns the loaded generator, checking its order against `k` when given.
///
/// The lock is released before returning; callers generate from the
/// cloned `Arc`.
fn loaded_generator(data: &Mutex<SharedData>, k: Option<usize>) -> Result<Arc<MarkovGenerator>, HttpResponse> {
	let generator = match data.lock() {
		Ok(shared_data) => shared_data.generator.clone(),
		Err(_) => return Err(HttpResponse::InternalServerError().body("Table lock failed")),
	};
	let Some(generator) = generator else {
		return Err(HttpResponse::BadRequest().body("No table loaded, pass table_seed or load a table"));
	};
	if let Some(k) = k {
		if k != generator.k() {
			return Err(HttpResponse::BadRequest().body(format!("Loaded table has order {}, not {}", generator.k(), k)));
		}
	}
	Ok(generator)
}

/// Renders one FASTA record, `>1` and 80 columns unless overridden.
fn fasta(name: &Option<String>, line_width: Option<usize>, seq: &Sequence) -> String {
	fasta_string(name.as_deref().unwrap_or("1"), seq, line_width.unwrap_or(DEFAULT_LINE_WIDTH))
}

/// HTTP GET endpoint `/v1/random`
///
/// Uniform random sequence as a FASTA record.
#[get("/v1/random")]
async fn get_random(query: web::Query<RandomParams>) -> impl Responder {
	match random_dna(query.length.unwrap_or(128), query.seed.unwrap_or(1)) {
		Ok(seq) => HttpResponse::Ok().body(fasta(&query.name, query.line_width, &seq)),
		Err(e) => HttpResponse::BadRequest().body(e.to_string()),
	}
}

/// HTTP GET endpoint `/v1/kmers`
///
/// Every k-mer in canonical order, one per line.
#[get("/v1/kmers")]
async fn get_kmers(query: web::Query<KmerParams>) -> impl Responder {
	match all_kmers(query.k.unwrap_or(2)) {
		Ok(kmers) => {
			let lines: Vec<String> = kmers.iter().map(|kmer| kmer.to_string()).collect();
			HttpResponse::Ok().body(lines.join("\n"))
		}
		Err(e) => HttpResponse::BadRequest().body(e.to_string()),
	}
}

/// HTTP GET endpoint `/v1/markov`
///
/// Markov chain sequence with burn-in. Uses the loaded table unless
/// `table_seed` is given, in which case a random table of order `k` is
/// synthesized for this request.
#[get("/v1/markov")]
async fn get_markov(data: web::Data<Mutex<SharedData>>, query: web::Query<MarkovParams>) -> impl Responder {
	let length = query.length.unwrap_or(128);
	let burnin = query.burnin.unwrap_or(1000);
	let seed = query.seed.unwrap_or(1);

	let result = match query.table_seed {
		Some(table_seed) => TransitionTable::random(query.k.unwrap_or(1), table_seed)
			.and_then(MarkovGenerator::new)
			.and_then(|generator| generator.generate(length, burnin, seed)),
		None => match loaded_generator(&data, query.k) {
			Ok(generator) => generator.generate(length, burnin, seed),
			Err(response) => return response,
		},
	};

	match result {
		Ok(seq) => HttpResponse::Ok().body(fasta(&query.name, query.line_width, &seq)),
		Err(e) => HttpResponse::BadRequest().body(e.to_string()),
	}
}

#[get("/v1/tables")]
async fn get_tables(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let data_dir = match data.lock() {
		Ok(m) => m.data_dir.clone(),
		Err(_) => return HttpResponse::InternalServerError().body("Table lock failed"),
	};
	match list_tables(&data_dir) {
		Ok(files) => HttpResponse::Ok().body(files.join("\n")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list tables"),
	}
}

/// Name and normalized matrix of the loaded table.
#[get("/v1/loaded_table")]
async fn get_loaded_table(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Table lock failed"),
	};
	let (Some(name), Some(generator)) = (&shared_data.table_name, &shared_data.generator) else {
		return HttpResponse::NotFound().body("No table loaded");
	};

	let mut body = format!("# {}\n", name).into_bytes();
	if write_matrix(&mut body, generator.table()).is_err() {
		return HttpResponse::InternalServerError().body("Failed to render table");
	}
	HttpResponse::Ok().body(body)
}

/// Loads `<data>/<name>.toml` (or `.bin`) and makes it the active table.
///
/// Only files listed by `/v1/tables` can be loaded; `name` is matched
/// against that listing, never joined onto the data directory as given.
#[put("/v1/load_table")]
async fn put_table(data: web::Data<Mutex<SharedData>>, query: web::Query<TableQuery>) -> impl Responder {
	let name = match &query.name {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty table name"),
	};

	let data_dir = match data.lock() {
		Ok(m) => m.data_dir.clone(),
		Err(_) => return HttpResponse::InternalServerError().body("Table lock failed"),
	};
	let files = match list_tables(&data_dir) {
		Ok(files) => files,
		Err(_) => return HttpResponse::InternalServerError().body("Failed to list tables"),
	};
	let candidates = [name.to_owned(), format!("{}.{}", name, TEXT_EXTENSION), format!("{}.{}", name, BINARY_EXTENSION)];
	let Some(file) = candidates.into_iter().find(|candidate| files.contains(candidate)) else {
		return HttpResponse::NotFound().body("Unknown table");
	};

	let path = data_dir.join(&file);
	let generator = match load_table(&path).and_then(MarkovGenerator::new) {
		Ok(g) => g,
		Err(e) => {
			warn!("Failed to load {}: {}", path.display(), e);
			return HttpResponse::BadRequest().body("Failed to load table");
		}
	};

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Table lock failed"),
	};
	info!("Loaded table '{}' (k={})", file, generator.k());
	shared_data.table_name = Some(get_filename(&path).unwrap_or(file));
	shared_data.generator = Some(Arc::new(generator));
	HttpResponse::Ok().body("Table loaded successfully")
}

/// Main entry point for the server.
///
/// Starts with no table loaded; `/v1/markov` needs either a `table_seed` or
/// a prior `PUT /v1/load_table`.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	let config = Config::parse();
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let shared_data = SharedData {
		data_dir: config.data,
		table_name: None,
		generator: None,
	};
	let shared_table = web::Data::new(Mutex::new(shared_data));

	info!("Listening on {}:{}", config.host, config.port);
	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_table.clone())
			.service(get_random)
			.service(get_kmers)
			.service(get_markov)
			.service(get_tables)
			.service(get_loaded_table)
			.service(put_table)
	})
		.bind((config.host.as_str(), config.port))?
		.run()
		.await
}

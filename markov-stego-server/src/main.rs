use std::env;
use std::sync::{Arc, RwLock};

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, post, put, web};
use env_logger::Env;
use log::{info, warn};
use serde::Deserialize;

use markov_stego_core::io::{get_filename, list_files};
use markov_stego_core::{Codec, ModelBuilder, StegoError, stego_decode, stego_encode};

/// Server settings, read from the environment.
///
/// - `MARKOV_STEGO_ADDR`: bind address (default `127.0.0.1:5000`)
/// - `MARKOV_STEGO_DATA`: folder holding the `.dat` corpora (default `./data`)
/// - `MARKOV_STEGO_ORDER`: order used when a load request gives none (default `2`)
#[derive(Clone, Debug)]
struct ServerConfig {
	addr: String,
	data_dir: String,
	default_order: usize,
}

impl ServerConfig {
	fn from_env() -> Self {
		Self {
			addr: env::var("MARKOV_STEGO_ADDR").unwrap_or_else(|_| "127.0.0.1:5000".to_owned()),
			data_dir: env::var("MARKOV_STEGO_DATA").unwrap_or_else(|_| "./data".to_owned()),
			default_order: env::var("MARKOV_STEGO_ORDER")
				.ok()
				.and_then(|order| order.parse().ok())
				.unwrap_or(2),
		}
	}
}

/// Query parameters of `/v1/load_models`
#[derive(Deserialize)]
struct ModelQuery {
	names: Option<String>,
	order: Option<usize>,
}

/// Query parameters of `/v1/encode` and `/v1/decode`
#[derive(Deserialize)]
struct PasswordQuery {
	#[serde(default)]
	password: String,
}

/// A codec and the names of the corpora its model was built from.
struct LoadedModel {
	names: Vec<String>,
	codec: Codec,
}

struct SharedData {
	config: ServerConfig,
	loaded: RwLock<Option<Arc<LoadedModel>>>,
}

impl SharedData {
	/// Snapshot of the current model; requests keep using it even if a new
	/// one is published meanwhile.
	fn current(&self) -> Result<Arc<LoadedModel>, HttpResponse> {
		match self.loaded.read() {
			Ok(loaded) => loaded
				.clone()
				.ok_or_else(|| HttpResponse::Conflict().body("No model loaded")),
			Err(_) => Err(HttpResponse::InternalServerError().body("Model lock failed")),
		}
	}
}

fn error_response(error: &StegoError) -> HttpResponse {
	match error {
		StegoError::Io(_) | StegoError::Serialization(_) => {
			HttpResponse::InternalServerError().body(error.to_string())
		}
		_ => HttpResponse::BadRequest().body(error.to_string()),
	}
}

/// Names of the `.dat` corpora of `data_dir`, without their extension.
fn corpus_names(data_dir: &str) -> std::io::Result<Vec<String>> {
	Ok(list_files(data_dir, "dat")?
		.iter()
		.filter_map(|file| get_filename(file).ok())
		.collect())
}

/// Counts the named corpora of `data_dir` into one model.
fn load_codec(data_dir: &str, names: &[String], order: usize) -> Result<Codec, StegoError> {
	let mut builder = ModelBuilder::new(order)?;
	let available = corpus_names(data_dir)?;
	if let Some(missing) = names.iter().find(|name| !available.contains(name)) {
		return Err(StegoError::UnknownCorpus(missing.clone()));
	}

	for name in names {
		builder.merge(&ModelBuilder::from_corpus_file(format!("{data_dir}/{name}.dat"), order)?)?;
	}
	Ok(Codec::new(Arc::new(builder.build())))
}

#[get("/v1/models")]
async fn get_models(data: web::Data<SharedData>) -> impl Responder {
	match corpus_names(&data.config.data_dir) {
		Ok(names) => HttpResponse::Ok().body(names.join("\n")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list models"),
	}
}

#[get("/v1/loaded_models")]
async fn get_loaded_models(data: web::Data<SharedData>) -> impl Responder {
	match data.loaded.read() {
		Ok(loaded) => HttpResponse::Ok().body(
			loaded
				.as_ref()
				.map(|model| model.names.join("\n"))
				.unwrap_or_default(),
		),
		Err(_) => HttpResponse::InternalServerError().body("Model lock failed"),
	}
}

/// HTTP PUT endpoint `/v1/load_models?names=a,b&order=2`
///
/// Builds one model from the listed corpora (their counts are added) and
/// publishes it for the next encode and decode requests.
#[put("/v1/load_models")]
async fn put_model(data: web::Data<SharedData>, query: web::Query<ModelQuery>) -> impl Responder {
	let query_names = match &query.names {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty model name"),
	};

	let names: Vec<String> = query_names
		.split(',')
		.map(|s| s.trim())
		.filter(|s| !s.is_empty())
		.map(str::to_owned)
		.collect();
	if names.iter().any(|name| name.contains('/') || name.contains('\\') || name.contains("..")) {
		return HttpResponse::BadRequest().body("Invalid model name");
	}
	let order = query.order.unwrap_or(data.config.default_order);

	let data_dir = data.config.data_dir.clone();
	let names_for_load = names.clone();
	let codec = match web::block(move || load_codec(&data_dir, &names_for_load, order)).await {
		Ok(Ok(codec)) => codec,
		Ok(Err(e)) => {
			warn!("failed to load {names:?}: {e}");
			return error_response(&e);
		}
		Err(_) => return HttpResponse::InternalServerError().body("Model loading was interrupted"),
	};

	match data.loaded.write() {
		Ok(mut loaded) => {
			info!("loaded {names:?} at order {order}");
			*loaded = Some(Arc::new(LoadedModel { names, codec }));
			HttpResponse::Ok().body("Models loaded successfully")
		}
		Err(_) => HttpResponse::InternalServerError().body("Model lock failed"),
	}
}

/// HTTP POST endpoint `/v1/encode?password=...`
///
/// Hides the plain-text body and returns the cover text.
#[post("/v1/encode")]
async fn post_encode(data: web::Data<SharedData>, query: web::Query<PasswordQuery>, body: String) -> impl Responder {
	let model = match data.current() {
		Ok(model) => model,
		Err(response) => return response,
	};
	let password = query.into_inner().password;

	match web::block(move || stego_encode(&model.codec, &body, &password)).await {
		Ok(Ok(text)) => HttpResponse::Ok().body(text),
		Ok(Err(e)) => error_response(&e),
		Err(_) => HttpResponse::InternalServerError().body("Encoding was interrupted"),
	}
}

/// HTTP POST endpoint `/v1/decode?password=...`
///
/// Recovers the plain text hidden in the cover-text body.
#[post("/v1/decode")]
async fn post_decode(data: web::Data<SharedData>, query: web::Query<PasswordQuery>, body: String) -> impl Responder {
	let model = match data.current() {
		Ok(model) => model,
		Err(response) => return response,
	};
	let password = query.into_inner().password;

	match web::block(move || stego_decode(&model.codec, &body, &password)).await {
		Ok(Ok(message)) => HttpResponse::Ok().body(message),
		Ok(Err(e)) => error_response(&e),
		Err(_) => HttpResponse::InternalServerError().body("Decoding was interrupted"),
	}
}

/// Main entry point for the server.
///
/// Starts with no model loaded: a client first calls `/v1/load_models`,
/// then `/v1/encode` and `/v1/decode`.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

	let config = ServerConfig::from_env();
	info!("serving {} on {}", config.data_dir, config.addr);
	let addr = config.addr.clone();

	let shared_data = web::Data::new(SharedData { config, loaded: RwLock::new(None) });

	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_data.clone())
			.service(get_models)
			.service(get_loaded_models)
			.service(put_model)
			.service(post_encode)
			.service(post_decode)
	})
		.bind(addr)?
		.run()
		.await
}

// ---------------------------------------------------------------------------
// StudyServer -- JSON-RPC dispatcher
// ---------------------------------------------------------------------------
//
// Routes incoming JSON-RPC 2.0 requests (NDJSON over stdin) to Recommender
// operations. `call()` holds the method table; `dispatch()` writes the reply.
// ---------------------------------------------------------------------------

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use serde::Deserialize;

use crate::catalog::{Catalog, CatalogSource};
use crate::error::StudyError;
use crate::protocol::*;
use crate::recommender::Recommender;
use crate::transport::NdjsonTransport;
use crate::types::Difficulty;

/// Similar topics returned when a request does not set topN.
const DEFAULT_SIMILAR_TOP_N: usize = 3;

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

pub struct StudyServer<W: Write = io::Stdout> {
	transport: NdjsonTransport<W>,
	recommender: Arc<Recommender>,
	/// Sources re-read by `catalog/reload`, in priority order.
	sources: Vec<Box<dyn CatalogSource>>,
	default_top_n: usize,
}

impl<W: Write> StudyServer<W> {
	pub fn new(
		transport: NdjsonTransport<W>,
		recommender: Arc<Recommender>,
		sources: Vec<Box<dyn CatalogSource>>,
		default_top_n: usize,
	) -> Self {
		Self {
			transport,
			recommender,
			sources,
			default_top_n,
		}
	}

	/// Main loop: read JSON-RPC messages from stdin until EOF.
	pub fn run(&mut self) -> Result<(), StudyError> {
		let stdin = io::stdin();
		self.serve(stdin.lock())
	}

	/// Read JSON-RPC messages from `reader`, one per line, until EOF.
	pub fn serve<R: BufRead>(&mut self, reader: R) -> Result<(), StudyError> {
		for line_result in reader.lines() {
			let line = line_result?;
			if line.trim().is_empty() {
				continue;
			}

			let request: JsonRpcRequest = match serde_json::from_str(&line) {
				Ok(r) => r,
				Err(e) => {
					tracing::error!("Failed to parse request: {}", e);
					continue;
				}
			};

			self.dispatch(request);
		}

		Ok(())
	}

	pub fn into_transport(self) -> NdjsonTransport<W> {
		self.transport
	}

	// ── Dispatch ──────────────────────────────────────────────────────────

	fn dispatch(&mut self, req: JsonRpcRequest) {
		let id = req.id;
		let Some(result) = self.call(&req.method, req.params) else {
			self.transport.write_error(
				id,
				METHOD_NOT_FOUND,
				format!("Unknown method: {}", req.method),
				None,
			);
			return;
		};

		match result {
			Ok(value) => self.transport.write_response(id, value),
			Err(e) => self.transport.write_error(
				id,
				STUDY_ERROR,
				e.to_string(),
				Some(e.to_json_rpc_error()),
			),
		}
	}

	/// Run one method. `None` when the method is unknown.
	pub fn call(
		&self,
		method: &str,
		params: serde_json::Value,
	) -> Option<Result<serde_json::Value, StudyError>> {
		let rec = self.recommender.as_ref();
		let result = match method {
			// -- Recommendation ------------------------------------------
			"study/recommend" => handle_recommend(rec, params, self.default_top_n),
			"study/similar" => handle_similar(rec, params),
			"study/classifyIntent" => handle_classify_intent(rec, params),

			// -- Catalog -------------------------------------------------
			"catalog/list" => Ok(serde_json::json!({ "topics": rec.list_topics() })),
			"catalog/get" => handle_get(rec, params),
			"catalog/resources" => handle_resources(rec, params),
			"catalog/reload" => self.handle_reload(),

			_ => return None,
		};
		Some(result)
	}

	// ── Reload ────────────────────────────────────────────────────────────

	fn handle_reload(&self) -> Result<serde_json::Value, StudyError> {
		let catalog = Catalog::load(&self.sources)?;
		let count = self.recommender.reload(catalog)?;
		Ok(serde_json::json!({ "topicCount": count }))
	}
}

// ---------------------------------------------------------------------------
// Param types
// ---------------------------------------------------------------------------

fn parse_params<T: serde::de::DeserializeOwned>(
	params: serde_json::Value,
) -> Result<T, StudyError> {
	serde_json::from_value(params)
		.map_err(|e| StudyError::Serialization(format!("Invalid params: {}", e)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecommendParams {
	query: String,
	top_n: Option<usize>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SimilarParams {
	topic: String,
	top_n: Option<usize>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryParams {
	query: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NameParams {
	name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourcesParams {
	name: String,
	difficulty: Option<Difficulty>,
	styles: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn handle_recommend(
	rec: &Recommender,
	params: serde_json::Value,
	default_top_n: usize,
) -> Result<serde_json::Value, StudyError> {
	let p: RecommendParams = parse_params(params)?;
	let recommendations = rec.recommend(&p.query, p.top_n.unwrap_or(default_top_n));
	Ok(serde_json::json!({ "recommendations": recommendations }))
}

fn handle_similar(
	rec: &Recommender,
	params: serde_json::Value,
) -> Result<serde_json::Value, StudyError> {
	let p: SimilarParams = parse_params(params)?;
	let recommendations = rec.similar_topics(&p.topic, p.top_n.unwrap_or(DEFAULT_SIMILAR_TOP_N));
	Ok(serde_json::json!({ "recommendations": recommendations }))
}

fn handle_classify_intent(
	rec: &Recommender,
	params: serde_json::Value,
) -> Result<serde_json::Value, StudyError> {
	let p: QueryParams = parse_params(params)?;
	serde_json::to_value(rec.classify_intent(&p.query))
		.map_err(|e| StudyError::Serialization(e.to_string()))
}

fn handle_get(rec: &Recommender, params: serde_json::Value) -> Result<serde_json::Value, StudyError> {
	let p: NameParams = parse_params(params)?;
	Ok(serde_json::json!({ "topic": rec.get_topic(&p.name) }))
}

fn handle_resources(
	rec: &Recommender,
	params: serde_json::Value,
) -> Result<serde_json::Value, StudyError> {
	let p: ResourcesParams = parse_params(params)?;
	let styles = p.styles.unwrap_or_else(|| vec!["video".to_string()]);
	let resources = rec.resources_for_topic(&p.name, p.difficulty.unwrap_or_default(), &styles);
	Ok(serde_json::json!({ "resources": resources }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

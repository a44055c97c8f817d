use std::path::PathBuf;

use clap::Parser;

use crate::catalog::{CatalogSource, JsonFileSource};
use crate::vector_space::{IndexConfig, DEFAULT_MAX_FEATURES};

#[derive(Parser, Debug)]
#[command(
	name = "study-engine",
	about = "Study topic recommendation engine over JSON-RPC 2.0 / NDJSON stdio"
)]
pub struct CliArgs {
	/// Catalog JSON files, tried in order until one loads
	#[arg(
		long = "catalog",
		env = "STUDY_CATALOG",
		value_delimiter = ',',
		default_values = ["data/sample_topics_complete.json", "data/sample_topics.json"]
	)]
	pub catalogs: Vec<PathBuf>,

	/// Recommendations returned when a request does not set topN
	#[arg(long, default_value = "5", env = "STUDY_TOP_N")]
	pub top_n: usize,

	/// Vocabulary cap for the TF-IDF space
	#[arg(long, default_value_t = DEFAULT_MAX_FEATURES)]
	pub max_features: usize,

	/// Log level (trace, debug, info, warn, error); RUST_LOG wins when set
	#[arg(long, default_value = "info", env = "STUDY_LOG_LEVEL")]
	pub log_level: String,
}

impl CliArgs {
	pub fn index_config(&self) -> IndexConfig {
		IndexConfig {
			max_features: self.max_features,
			..IndexConfig::default()
		}
	}

	/// Catalog sources in priority order.
	pub fn catalog_sources(&self) -> Vec<Box<dyn CatalogSource>> {
		self.catalogs
			.iter()
			.map(|p| Box::new(JsonFileSource::new(p)) as Box<dyn CatalogSource>)
			.collect()
	}
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StudyError {
	#[error("Catalog unavailable: every source failed ({0})")]
	CatalogUnavailable(String),
	#[error("Catalog parse error in {source_name}: {message}")]
	CatalogParse { source_name: String, message: String },
	#[error("Duplicate topic name: {0}")]
	DuplicateTopic(String),
	#[error("Empty catalog: cannot build a vector space over zero topics")]
	EmptyCatalog,
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	#[error("Serialization error: {0}")]
	Serialization(String),
}

impl StudyError {
	pub fn code(&self) -> &str {
		match self {
			Self::CatalogUnavailable(_) => "STUDY_CATALOG_UNAVAILABLE",
			Self::CatalogParse { .. } => "STUDY_CATALOG_PARSE",
			Self::DuplicateTopic(_) => "STUDY_DUPLICATE_TOPIC",
			Self::EmptyCatalog => "STUDY_EMPTY_CATALOG",
			Self::Io(_) => "STUDY_IO",
			Self::Serialization(_) => "STUDY_INVALID_PARAMS",
		}
	}

	pub fn to_json_rpc_error(&self) -> serde_json::Value {
		serde_json::json!({
			"studyCode": self.code(),
			"message": self.to_string(),
		})
	}
}

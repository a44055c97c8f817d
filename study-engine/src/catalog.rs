// ---------------------------------------------------------------------------
// Topic Catalog -- ordered, immutable set of learnable topics
// ---------------------------------------------------------------------------
//
// Loads the topic catalog from an ordered list of sources (first success
// wins), validates it, and answers name lookups. Row position in the catalog
// is the row id used by the vector space.
// ---------------------------------------------------------------------------

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StudyError;
use crate::normalize::fold_case;
use crate::types::{Difficulty, Topic};

/// Links taken from the requested difficulty level.
const DIFFICULTY_LINKS: usize = 2;
/// Links taken from each requested learning style.
const STYLE_LINKS: usize = 1;
/// Cap on the combined resource list.
const MAX_RESOURCES: usize = 5;

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// On-disk catalog document: `{ "topics": [ ... ] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
	#[serde(default)]
	pub topics: Vec<Topic>,
}

/// Anything that can yield an ordered list of topics.
pub trait CatalogSource: Send + Sync {
	/// Human-readable label used in logs and errors.
	fn describe(&self) -> String;
	fn load(&self) -> Result<Vec<Topic>, StudyError>;
}

/// A JSON catalog file on disk.
pub struct JsonFileSource {
	path: PathBuf,
}

impl JsonFileSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl CatalogSource for JsonFileSource {
	fn describe(&self) -> String {
		self.path.display().to_string()
	}

	fn load(&self) -> Result<Vec<Topic>, StudyError> {
		let raw = fs::read_to_string(&self.path)?;
		let file: CatalogFile =
			serde_json::from_str(&raw).map_err(|e| StudyError::CatalogParse {
				source_name: self.describe(),
				message: e.to_string(),
			})?;
		Ok(file.topics)
	}
}

/// Topics held in memory.
pub struct StaticSource {
	label: String,
	topics: Vec<Topic>,
}

impl StaticSource {
	pub fn new(label: impl Into<String>, topics: Vec<Topic>) -> Self {
		Self {
			label: label.into(),
			topics,
		}
	}
}

impl CatalogSource for StaticSource {
	fn describe(&self) -> String {
		self.label.clone()
	}

	fn load(&self) -> Result<Vec<Topic>, StudyError> {
		Ok(self.topics.clone())
	}
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Catalog {
	topics: Vec<Topic>,
	/// folded name -> row id
	by_name: HashMap<String, usize>,
}

impl Catalog {
	/// Validate and wrap `topics`. Rejects an empty list and names that
	/// collide case-insensitively.
	pub fn new(topics: Vec<Topic>) -> Result<Self, StudyError> {
		if topics.is_empty() {
			return Err(StudyError::EmptyCatalog);
		}

		let mut by_name = HashMap::with_capacity(topics.len());
		for (row, topic) in topics.iter().enumerate() {
			if by_name.insert(fold_case(&topic.name), row).is_some() {
				return Err(StudyError::DuplicateTopic(topic.name.clone()));
			}
		}

		Ok(Self { topics, by_name })
	}

	/// Try each source in order and return the first catalog that loads and
	/// validates. Fails only when every source fails.
	pub fn load(sources: &[Box<dyn CatalogSource>]) -> Result<Self, StudyError> {
		let mut failures = Vec::new();

		for source in sources {
			match source.load().and_then(Self::new) {
				Ok(catalog) => {
					tracing::info!(
						source = %source.describe(),
						topics = catalog.len(),
						"Catalog loaded"
					);
					return Ok(catalog);
				}
				Err(e) => {
					tracing::warn!(source = %source.describe(), "Catalog source failed: {}", e);
					failures.push(format!("{}: {}", source.describe(), e));
				}
			}
		}

		if failures.is_empty() {
			return Err(StudyError::CatalogUnavailable(
				"no catalog sources configured".into(),
			));
		}
		Err(StudyError::CatalogUnavailable(failures.join("; ")))
	}

	/// Case-insensitive exact name lookup.
	pub fn get(&self, name: &str) -> Option<&Topic> {
		self.position(name).map(|row| &self.topics[row])
	}

	/// Row id of the named topic.
	pub fn position(&self, name: &str) -> Option<usize> {
		self.by_name.get(&fold_case(name)).copied()
	}

	pub fn topic_at(&self, row: usize) -> Option<&Topic> {
		self.topics.get(row)
	}

	pub fn topics(&self) -> &[Topic] {
		&self.topics
	}

	/// Topic names in catalog order.
	pub fn names(&self) -> Vec<String> {
		self.topics.iter().map(|t| t.name.clone()).collect()
	}

	/// Indexed text per topic, in row order.
	pub fn documents(&self) -> Vec<String> {
		self.topics.iter().map(Topic::document).collect()
	}

	pub fn len(&self) -> usize {
		self.topics.len()
	}

	pub fn is_empty(&self) -> bool {
		self.topics.is_empty()
	}

	/// Study links for a topic: the first links of the requested difficulty,
	/// then the first link of each requested learning style. Duplicates are
	/// dropped and the list is capped. Empty for an unknown topic.
	pub fn resources_for(
		&self,
		name: &str,
		difficulty: Difficulty,
		styles: &[String],
	) -> Vec<String> {
		let Some(topic) = self.get(name) else {
			return Vec::new();
		};

		let mut candidates: Vec<&String> = Vec::new();
		if let Some(links) = topic.difficulty.get(&difficulty) {
			candidates.extend(links.iter().take(DIFFICULTY_LINKS));
		}
		for style in styles {
			if let Some(links) = topic.learning_style.get(&style_key(style)) {
				candidates.extend(links.iter().take(STYLE_LINKS));
			}
		}

		let mut seen = HashSet::new();
		candidates
			.into_iter()
			.filter(|link| seen.insert(*link))
			.take(MAX_RESOURCES)
			.cloned()
			.collect()
	}
}

/// Style tags arrive decorated from the UI ("📹 Video"); strip the leading
/// decoration and fold case.
fn style_key(style: &str) -> String {
	fold_case(style.trim_start_matches(|c: char| !c.is_alphanumeric()).trim())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

// ---------------------------------------------------------------------------
// Recommender -- query → ranked topics
// ---------------------------------------------------------------------------
//
// Orchestrates normalize → expand → embed → rank → threshold over an
// immutable snapshot of (catalog, vector space). A catalog reload builds a
// new snapshot and swaps it in atomically; readers keep whichever snapshot
// they loaded, so no query ever mixes two catalogs.
// ---------------------------------------------------------------------------

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::catalog::Catalog;
use crate::error::StudyError;
use crate::intent;
use crate::normalize::{expand, normalize};
use crate::types::{Difficulty, QueryIntent, Recommendation, Topic};
use crate::vector_space::{IndexConfig, RankedRow, VectorSpace};

/// Scores at or below this are treated as noise and dropped.
pub const MIN_SIMILARITY: f64 = 0.01;

// ---------------------------------------------------------------------------
// IndexSnapshot
// ---------------------------------------------------------------------------

/// A catalog together with the vector space fitted over it. Row ids in the
/// space are positions in the catalog.
pub struct IndexSnapshot {
	catalog: Catalog,
	space: VectorSpace,
}

impl IndexSnapshot {
	pub fn build(catalog: Catalog, config: &IndexConfig) -> Result<Self, StudyError> {
		let space = VectorSpace::build(&catalog.documents(), config)?;
		Ok(Self { catalog, space })
	}

	pub fn catalog(&self) -> &Catalog {
		&self.catalog
	}

	pub fn space(&self) -> &VectorSpace {
		&self.space
	}

	/// Topics most similar to `query`, best first, at most `top_n`.
	pub fn recommend(&self, query: &str, top_n: usize) -> Vec<Recommendation> {
		let normalized = normalize(query);
		let expanded = expand(&normalized);
		let vector = self.space.embed(&expanded);
		let ranked = self.space.rank(&vector, top_n);

		tracing::debug!(query, expanded = %expanded, candidates = ranked.len(), "Ranked query");
		self.to_recommendations(ranked, MIN_SIMILARITY)
	}

	/// Topics most similar to the named topic, never including the topic
	/// itself. Empty when the name is not in the catalog.
	pub fn similar_topics(&self, topic_name: &str, top_n: usize) -> Vec<Recommendation> {
		let Some(row) = self.catalog.position(topic_name) else {
			return Vec::new();
		};
		let ranked = self.space.rank_excluding(row, top_n);
		self.to_recommendations(ranked, 0.0)
	}

	fn to_recommendations(&self, ranked: Vec<RankedRow>, floor: f64) -> Vec<Recommendation> {
		ranked
			.into_iter()
			.filter(|r| r.score > floor)
			.filter_map(|r| {
				self.catalog.topic_at(r.row).map(|t| Recommendation {
					topic: t.name.clone(),
					score: r.score,
				})
			})
			.collect()
	}
}

// ---------------------------------------------------------------------------
// Recommender
// ---------------------------------------------------------------------------

/// Entry point for callers. Cheap to share behind an `Arc`; all reads go
/// through the current snapshot without locking.
pub struct Recommender {
	snap: ArcSwap<IndexSnapshot>,
	config: IndexConfig,
}

impl Recommender {
	pub fn new(catalog: Catalog, config: IndexConfig) -> Result<Self, StudyError> {
		let snap = IndexSnapshot::build(catalog, &config)?;
		Ok(Self {
			snap: ArcSwap::from_pointee(snap),
			config,
		})
	}

	/// The snapshot currently in use. Holding it pins that catalog version.
	pub fn snapshot(&self) -> Arc<IndexSnapshot> {
		self.snap.load_full()
	}

	pub fn recommend(&self, query: &str, top_n: usize) -> Vec<Recommendation> {
		self.snap.load().recommend(query, top_n)
	}

	pub fn similar_topics(&self, topic_name: &str, top_n: usize) -> Vec<Recommendation> {
		self.snap.load().similar_topics(topic_name, top_n)
	}

	pub fn classify_intent(&self, query: &str) -> QueryIntent {
		intent::classify(query)
	}

	/// Case-insensitive exact lookup.
	pub fn get_topic(&self, name: &str) -> Option<Topic> {
		self.snap.load().catalog().get(name).cloned()
	}

	/// Topic names in catalog order.
	pub fn list_topics(&self) -> Vec<String> {
		self.snap.load().catalog().names()
	}

	pub fn resources_for_topic(
		&self,
		name: &str,
		difficulty: Difficulty,
		styles: &[String],
	) -> Vec<String> {
		self.snap
			.load()
			.catalog()
			.resources_for(name, difficulty, styles)
	}

	/// Rebuild the index over `catalog` and swap it in. On error the current
	/// snapshot stays in place. Returns the new topic count.
	pub fn reload(&self, catalog: Catalog) -> Result<usize, StudyError> {
		let next = IndexSnapshot::build(catalog, &self.config)?;
		let count = next.catalog().len();
		let vocabulary = next.space().vocabulary_size();
		self.snap.store(Arc::new(next));
		tracing::info!(topics = count, vocabulary, "Index reloaded");
		Ok(count)
	}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

// ---------------------------------------------------------------------------
// Vector Space -- TF-IDF term space over catalog documents
// ---------------------------------------------------------------------------
//
// Fits a unigram + bigram vocabulary over the catalog documents, keeps the
// most frequent terms, and stores one L2-normalized TF-IDF row per document.
// Queries are projected into the same space and ranked by cosine similarity.
// Immutable once built; a catalog reload builds a new instance.
// ---------------------------------------------------------------------------

use std::collections::HashMap;

use crate::cosine::{cosine_similarity, l2_normalize};
use crate::error::StudyError;
use crate::normalize::{fold_case, is_word_char};

/// Default vocabulary cap.
pub const DEFAULT_MAX_FEATURES: usize = 100;

/// Score assigned to an excluded row before ranking. Below any cosine score
/// a non-negative weight space can produce.
pub const EXCLUDED_SCORE: f64 = -1.0;

// ---------------------------------------------------------------------------
// Configuration / result types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct IndexConfig {
	/// Maximum number of terms retained, ranked by corpus term frequency.
	pub max_features: usize,
	/// Largest n-gram size. Unigrams are always included.
	pub max_ngram: usize,
}

impl Default for IndexConfig {
	fn default() -> Self {
		Self {
			max_features: DEFAULT_MAX_FEATURES,
			max_ngram: 2,
		}
	}
}

/// A ranked document row and its similarity to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedRow {
	pub row: usize,
	pub score: f64,
}

/// Corpus-level statistics for one candidate term.
struct TermStats {
	total_tf: usize,
	df: usize,
	first_seen: usize,
}

// ---------------------------------------------------------------------------
// VectorSpace
// ---------------------------------------------------------------------------

pub struct VectorSpace {
	/// term -> column id
	vocabulary: HashMap<String, usize>,
	/// column id -> term
	terms: Vec<String>,
	/// IDF weight per column
	idf: Vec<f32>,
	/// one normalized weight vector per document, in document order
	rows: Vec<Vec<f32>>,
	max_ngram: usize,
}

impl VectorSpace {
	/// Fit the vocabulary and weight matrix over `documents`.
	///
	/// Terms are ranked by total frequency across the corpus; ties keep the
	/// term seen first. Fails on an empty corpus.
	pub fn build<S: AsRef<str>>(documents: &[S], config: &IndexConfig) -> Result<Self, StudyError> {
		if documents.is_empty() {
			return Err(StudyError::EmptyCatalog);
		}

		let max_ngram = config.max_ngram.max(1);
		let analyzed: Vec<Vec<String>> = documents
			.iter()
			.map(|d| analyze(d.as_ref(), max_ngram))
			.collect();

		// Corpus statistics in insertion order
		let mut order: Vec<String> = Vec::new();
		let mut stats: HashMap<String, TermStats> = HashMap::new();
		for terms in &analyzed {
			let counts = count_terms(terms);
			for term in terms {
				if !stats.contains_key(term) {
					stats.insert(
						term.clone(),
						TermStats {
							total_tf: 0,
							df: 0,
							first_seen: order.len(),
						},
					);
					order.push(term.clone());
				}
			}
			for (term, count) in counts {
				if let Some(s) = stats.get_mut(term) {
					s.total_tf += count;
					s.df += 1;
				}
			}
		}

		// Feature selection: most frequent first, insertion order on ties
		let mut ranked: Vec<&String> = order.iter().collect();
		ranked.sort_by(|a, b| {
			let sa = &stats[*a];
			let sb = &stats[*b];
			sb.total_tf
				.cmp(&sa.total_tf)
				.then(sa.first_seen.cmp(&sb.first_seen))
		});
		ranked.truncate(config.max_features);
		ranked.sort_by_key(|t| stats[*t].first_seen);

		let terms: Vec<String> = ranked.into_iter().cloned().collect();
		let vocabulary: HashMap<String, usize> = terms
			.iter()
			.enumerate()
			.map(|(col, term)| (term.clone(), col))
			.collect();

		// Smoothed IDF
		let n = documents.len() as f64;
		let idf: Vec<f32> = terms
			.iter()
			.map(|term| {
				let df = stats[term].df as f64;
				(((1.0 + n) / (1.0 + df)).ln() + 1.0) as f32
			})
			.collect();

		let mut space = Self {
			vocabulary,
			terms,
			idf,
			rows: Vec::with_capacity(analyzed.len()),
			max_ngram,
		};
		let rows: Vec<Vec<f32>> = analyzed.iter().map(|t| space.weigh(t)).collect();
		space.rows = rows;

		tracing::debug!(
			documents = space.rows.len(),
			vocabulary = space.terms.len(),
			"Vector space built"
		);
		Ok(space)
	}

	/// Project arbitrary text into the fitted term space. Unknown terms are
	/// dropped; text with no known terms yields the zero vector.
	pub fn embed(&self, text: &str) -> Vec<f32> {
		self.weigh(&analyze(text, self.max_ngram))
	}

	/// Rank every document against `query` and keep the best `top_n`.
	///
	/// Sorted descending by score; equal scores keep ascending row order.
	pub fn rank(&self, query: &[f32], top_n: usize) -> Vec<RankedRow> {
		let scores = self
			.rows
			.iter()
			.map(|row| cosine_similarity(query, row))
			.collect();
		rank_scores(scores, top_n)
	}

	/// Rank every document against document `row`, with `row` itself forced
	/// to [`EXCLUDED_SCORE`]. Returns empty if `row` is out of range.
	pub fn rank_excluding(&self, row: usize, top_n: usize) -> Vec<RankedRow> {
		let Some(target) = self.rows.get(row) else {
			return Vec::new();
		};
		let mut scores: Vec<f64> = self
			.rows
			.iter()
			.map(|other| cosine_similarity(target, other))
			.collect();
		scores[row] = EXCLUDED_SCORE;
		rank_scores(scores, top_n)
	}

	/// Number of document rows.
	pub fn len(&self) -> usize {
		self.rows.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	/// Number of retained terms (columns).
	pub fn vocabulary_size(&self) -> usize {
		self.terms.len()
	}

	/// Retained terms in column order.
	pub fn terms(&self) -> &[String] {
		&self.terms
	}

	pub fn contains_term(&self, term: &str) -> bool {
		self.vocabulary.contains_key(term)
	}

	/// Weight vector of document `row`.
	pub fn row(&self, row: usize) -> Option<&[f32]> {
		self.rows.get(row).map(|r| r.as_slice())
	}

	fn weigh(&self, terms: &[String]) -> Vec<f32> {
		let mut vector = vec![0.0f32; self.terms.len()];
		for (term, count) in count_terms(terms) {
			if let Some(&col) = self.vocabulary.get(term) {
				vector[col] = count as f32 * self.idf[col];
			}
		}
		l2_normalize(&mut vector);
		vector
	}
}

// ---------------------------------------------------------------------------
// Analysis helpers
// ---------------------------------------------------------------------------

/// Word tokens of two or more word characters, case-folded.
fn word_tokens(text: &str) -> Vec<String> {
	fold_case(text)
		.split(|c: char| !is_word_char(c))
		.filter(|t| t.chars().count() >= 2)
		.map(|t| t.to_string())
		.collect()
}

/// Unigrams followed by each larger n-gram size up to `max_ngram`, words
/// joined by a single space.
fn analyze(text: &str, max_ngram: usize) -> Vec<String> {
	let words = word_tokens(text);
	let mut terms = words.clone();
	for n in 2..=max_ngram {
		for window in words.windows(n) {
			terms.push(window.join(" "));
		}
	}
	terms
}

fn count_terms(terms: &[String]) -> Vec<(&String, usize)> {
	let mut counts: Vec<(&String, usize)> = Vec::new();
	let mut index: HashMap<&String, usize> = HashMap::new();
	for term in terms {
		match index.get(term) {
			Some(&i) => counts[i].1 += 1,
			None => {
				index.insert(term, counts.len());
				counts.push((term, 1));
			}
		}
	}
	counts
}

fn rank_scores(scores: Vec<f64>, top_n: usize) -> Vec<RankedRow> {
	let mut ranked: Vec<RankedRow> = scores
		.into_iter()
		.enumerate()
		.map(|(row, score)| RankedRow { row, score })
		.collect();
	ranked.sort_by(|a, b| {
		b.score
			.partial_cmp(&a.score)
			.unwrap_or(std::cmp::Ordering::Equal)
			.then(a.row.cmp(&b.row))
	});
	ranked.truncate(top_n);
	ranked
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
	use super::*;
	use crate::cosine::magnitude;

	fn space(docs: &[&str]) -> VectorSpace {
		VectorSpace::build(docs, &IndexConfig::default()).unwrap()
	}

	#[test]
	fn build_rejects_empty_corpus() {
		let docs: [&str; 0] = [];
		let err = VectorSpace::build(&docs, &IndexConfig::default());
		assert!(matches!(err, Err(StudyError::EmptyCatalog)));
	}

	#[test]
	fn analyzer_emits_unigrams_then_bigrams() {
		let terms = analyze("Makine Öğrenmesi ve AI", 2);
		assert_eq!(
			terms,
			vec![
				"makine",
				"öğrenmesi",
				"ve",
				"ai",
				"makine öğrenmesi",
				"öğrenmesi ve",
				"ve ai",
			]
		);
	}

	#[test]
	fn analyzer_drops_single_char_tokens() {
		assert_eq!(analyze("c r go", 1), vec!["go"]);
	}

	#[test]
	fn vocabulary_capped_by_corpus_frequency() {
		let docs = ["rust go java", "rust go", "rust python"];
		let config = IndexConfig {
			max_features: 2,
			max_ngram: 2,
		};
		let space = VectorSpace::build(&docs, &config).unwrap();
		assert_eq!(space.vocabulary_size(), 2);
		// "go" and "rust go" both occur twice; "go" was seen first
		assert!(space.contains_term("rust"));
		assert!(space.contains_term("go"));
		assert!(!space.contains_term("rust go"));
	}

	#[test]
	fn rows_are_unit_length() {
		let space = space(&["python kod yazılım", "web html css", "veri analiz"]);
		for i in 0..space.len() {
			assert!((magnitude(space.row(i).unwrap()) - 1.0).abs() < 1e-5);
		}
	}

	#[test]
	fn rare_terms_weigh_more() {
		let space = space(&["python web", "python veri"]);
		let row = space.row(0).unwrap();
		let python = space.terms().iter().position(|t| t == "python").unwrap();
		let web = space.terms().iter().position(|t| t == "web").unwrap();
		assert!(row[web] > row[python]);
	}

	#[test]
	fn embed_unknown_text_is_zero() {
		let space = space(&["python kod", "web site"]);
		let v = space.embed("kuantum fiziği");
		assert_eq!(v.len(), space.vocabulary_size());
		assert!(v.iter().all(|&x| x == 0.0));
		assert!(space.rank(&v, 5).iter().all(|r| r.score == 0.0));
	}

	#[test]
	fn rank_sorts_descending_and_truncates() {
		let space = space(&["java spring", "python django web", "python flask"]);
		let q = space.embed("python flask");
		let ranked = space.rank(&q, 2);
		assert_eq!(ranked.len(), 2);
		assert_eq!(ranked[0].row, 2);
		assert!(ranked[0].score >= ranked[1].score);
		assert!(ranked[0].score <= 1.0);
	}

	#[test]
	fn rank_ties_keep_row_order() {
		let space = space(&["python kod", "java", "python kod"]);
		let q = space.embed("python");
		let ranked = space.rank(&q, 3);
		assert_eq!(ranked[0].row, 0);
		assert_eq!(ranked[1].row, 2);
		assert_eq!(ranked[0].score, ranked[1].score);
		assert_eq!(ranked[2].row, 1);
	}

	#[test]
	fn rank_excluding_sinks_the_row() {
		let space = space(&["python kod", "python web", "java"]);
		let ranked = space.rank_excluding(0, 3);
		assert_eq!(ranked.len(), 3);
		assert_eq!(ranked[0].row, 1);
		assert_eq!(ranked[2].row, 0);
		assert_eq!(ranked[2].score, EXCLUDED_SCORE);
	}

	#[test]
	fn rank_excluding_out_of_range_is_empty() {
		let space = space(&["python"]);
		assert!(space.rank_excluding(3, 5).is_empty());
	}

	#[test]
	fn build_is_deterministic() {
		let docs = ["yapay zeka ai", "veri bilimi data", "web site html"];
		let a = space(&docs);
		let b = space(&docs);
		assert_eq!(a.terms(), b.terms());
		for i in 0..a.len() {
			assert_eq!(a.row(i), b.row(i));
		}
	}
}

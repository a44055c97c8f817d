use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(
	Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
	#[default]
	Beginner,
	Intermediate,
	Advanced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
	pub name: String,
	pub keywords: String,
	#[serde(default)]
	pub difficulty: BTreeMap<Difficulty, Vec<String>>,
	#[serde(default)]
	pub learning_style: BTreeMap<String, Vec<String>>,
}

impl Topic {
	/// Text the vector space indexes for this topic: name followed by keywords.
	pub fn document(&self) -> String {
		format!("{} {}", self.name, self.keywords)
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
	pub topic: String,
	pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentKind {
	Learning,
	Comparison,
	Question,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryIntent {
	pub intent: IntentKind,
	pub confidence: f64,
	pub keywords: Vec<String>,
}

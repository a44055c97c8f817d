// ---------------------------------------------------------------------------
// Intent Classifier -- rule-based query tagging
// ---------------------------------------------------------------------------

use crate::normalize::{fold_case, tokens};
use crate::types::{IntentKind, QueryIntent};

/// Confidence when no rule matches.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;
/// Keywords reported per query.
const MAX_KEYWORDS: usize = 5;
/// Keywords must be longer than this many characters.
const MIN_KEYWORD_CHARS: usize = 3;

struct IntentRule {
	markers: &'static [&'static str],
	intent: IntentKind,
	confidence: f64,
}

/// Evaluated in order; the first rule with a matching marker wins.
const RULES: &[IntentRule] = &[
	IntentRule {
		markers: &["öğrenmek", "öğrenme", "nasıl", "başlangıç", "temel"],
		intent: IntentKind::Learning,
		confidence: 0.8,
	},
	IntentRule {
		markers: &["fark", "karşılaştır", "hangisi", "vs", "versus"],
		intent: IntentKind::Comparison,
		confidence: 0.85,
	},
	IntentRule {
		markers: &["nedir", "ne", "neden", "kim", "hangi"],
		intent: IntentKind::Question,
		confidence: 0.75,
	},
];

/// Tag `query` with an intent and pull out its leading keywords.
///
/// Markers are matched by substring against the case-folded raw query, so
/// "ne" also fires inside longer words.
pub fn classify(query: &str) -> QueryIntent {
	let folded = fold_case(query);

	let (intent, confidence) = RULES
		.iter()
		.find(|rule| rule.markers.iter().any(|m| folded.contains(m)))
		.map(|rule| (rule.intent, rule.confidence))
		.unwrap_or((IntentKind::Learning, DEFAULT_CONFIDENCE));

	let keywords = tokens(query)
		.into_iter()
		.filter(|t| t.chars().count() > MIN_KEYWORD_CHARS)
		.take(MAX_KEYWORDS)
		.collect();

	QueryIntent {
		intent,
		confidence,
		keywords,
	}
}

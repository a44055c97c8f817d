// ---------------------------------------------------------------------------
// Text Normalizer
// ---------------------------------------------------------------------------
//
// Pure-function helpers that turn a raw user query into the form the vector
// space indexes: Turkish-aware case folding, punctuation stripping, suffix
// collapsing, and synonym expansion.
// ---------------------------------------------------------------------------

use std::sync::LazyLock;

use regex::Regex;

// ---------------------------------------------------------------------------
// Static tables
// ---------------------------------------------------------------------------

/// Derivational suffix rules. Each pattern is anchored at a word end and
/// rewritten to its captured stem.
const SUFFIX_RULES: &[(&str, &str)] = &[
	(r"(robot)ik\b", "${1}"),
	(r"(program)lama\b", "${1}"),
	(r"(öğren)me\b", "${1}"),
	(r"(geliştir)me\b", "${1}"),
	(r"(veri)\s+bilim\w*", "${1}"),
	(r"(web)\s+geliştir\w*", "${1}"),
];

/// Synonym table, evaluated in order. A key fires when it is a substring of
/// the folded input, not only when it is a whole token.
pub const SYNONYMS: &[(&str, &str)] = &[
	("öğrenmek", "öğrenme eğitim"),
	("öğrenme", "öğrenmek eğitim"),
	("yapmak", "geliştirme yapma"),
	("yapma", "yapmak geliştirme"),
	("kod", "programlama kod yazma"),
	("programlama", "kod yazma program"),
	("uygulama", "app yazılım program"),
	("robot", "robotik robotics otomasyon"),
	("robotik", "robot robotics otomasyon"),
	("web", "website site internet"),
	("veri", "data bilim analiz"),
	("yapay", "ai artificial zeka"),
	("makine", "machine learning öğrenme"),
];

static SUFFIX_REGEXES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
	SUFFIX_RULES
		.iter()
		.filter_map(|(pattern, replacement)| Regex::new(pattern).ok().map(|re| (re, *replacement)))
		.collect()
});

// ---------------------------------------------------------------------------
// Case folding
// ---------------------------------------------------------------------------

/// Lowercase `text` without corrupting the Turkish alphabet.
///
/// `İ` folds to a plain `i` instead of `i` followed by U+0307 COMBINING DOT
/// ABOVE, which is what Unicode default lowercasing produces. Every other
/// character uses the standard mapping, so `Ş Ğ Ü Ö Ç` fold to their
/// lowercase forms.
pub fn fold_case(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'İ' | 'I' => out.push('i'),
			_ => out.extend(c.to_lowercase()),
		}
	}
	out
}

/// Word-character class: letters (accented included), digits, underscore.
pub(crate) fn is_word_char(c: char) -> bool {
	c.is_alphanumeric() || c == '_'
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Fold case, drop everything that is not a word character or whitespace,
/// collapse known suffix variants to their stems, and trim.
pub fn normalize(raw: &str) -> String {
	let mut text: String = fold_case(raw)
		.chars()
		.filter(|c| is_word_char(*c) || c.is_whitespace())
		.collect();

	for (re, replacement) in SUFFIX_REGEXES.iter() {
		text = re.replace_all(&text, *replacement).into_owned();
	}

	text.trim().to_string()
}

/// Append the expansion of every synonym key contained in `normalized`.
pub fn expand(normalized: &str) -> String {
	let folded = fold_case(normalized);
	let mut expanded = normalized.to_string();

	for (key, expansion) in SYNONYMS {
		if folded.contains(key) {
			expanded.push(' ');
			expanded.push_str(expansion);
		}
	}

	expanded
}

/// Whitespace tokens of the normalized text.
pub fn tokens(raw: &str) -> Vec<String> {
	normalize(raw)
		.split_whitespace()
		.map(|t| t.to_string())
		.collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

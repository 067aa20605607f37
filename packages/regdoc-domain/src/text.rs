use std::collections::HashSet;

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};
use unicode_segmentation::UnicodeSegmentation;

/// How strongly a candidate text matches a query, strongest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchKind {
	/// The whole text starts with the query.
	Prefix,
	/// Some word of the text starts with the query.
	WordPrefix,
	/// The query occurs somewhere inside the text.
	Substring,
	None,
}

/// Folds case and accents and collapses whitespace, so "Arrêté  n°" and "arrete n°" compare
/// equal.
pub fn normalize_text(input: &str) -> String {
	let mut out = String::with_capacity(input.len());
	let mut pending_space = false;

	for ch in input.nfkd() {
		if is_combining_mark(ch) {
			continue;
		}
		if ch.is_whitespace() {
			pending_space = !out.is_empty();

			continue;
		}
		if pending_space {
			out.push(' ');

			pending_space = false;
		}

		out.extend(ch.to_lowercase());
	}

	out
}

/// Both arguments must already be normalized with [`normalize_text`].
pub fn match_kind(normalized_query: &str, normalized_text: &str) -> MatchKind {
	if normalized_query.is_empty() {
		return MatchKind::None;
	}
	if normalized_text.starts_with(normalized_query) {
		return MatchKind::Prefix;
	}
	if normalized_text.unicode_word_indices().any(|(idx, _)| {
		normalized_text.get(idx..).is_some_and(|tail| tail.starts_with(normalized_query))
	}) {
		return MatchKind::WordPrefix;
	}
	if normalized_text.contains(normalized_query) {
		return MatchKind::Substring;
	}

	MatchKind::None
}

pub fn tokenize_terms(text: &str, max_terms: usize) -> HashSet<String> {
	if max_terms == 0 {
		return HashSet::new();
	}

	let normalized = normalize_text(text);
	let mut out = HashSet::new();

	for word in normalized.unicode_words() {
		if word.chars().count() < 2 {
			continue;
		}

		out.insert(word.to_string());

		if out.len() >= max_terms {
			break;
		}
	}

	out
}

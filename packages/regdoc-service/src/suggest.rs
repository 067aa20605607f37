use std::{cmp::Reverse, collections::HashSet};

use regdoc_domain::{
	MatchKind, SearchQuery, SourceType, SuggestionCandidate, SuggestionTier, match_kind,
	normalize_text,
};
use regdoc_sanitize::Sanitizer;

use crate::{PopularityCounter, Result, SearchService, SuggestionRow};

#[derive(Debug, Clone)]
struct RankedSuggestion {
	candidate: SuggestionCandidate,
	tier: SuggestionTier,
	match_kind: MatchKind,
	input_rank: usize,
}

impl SearchService {
	/// Ranked completion candidates for a partial query, at most `limit` of them.
	///
	/// Queries below the configured minimum length return an empty list without touching the
	/// store.
	pub async fn get_suggestions(
		&self,
		query: &str,
		limit: u32,
	) -> Result<Vec<SuggestionCandidate>> {
		let query = SearchQuery::new(query).with_min_length(self.cfg.search.min_query_chars);
		let limit = limit.min(self.cfg.suggestions.max_limit);

		if limit == 0 || !query.is_retrievable() {
			return Ok(Vec::new());
		}

		let fetch_limit = limit.saturating_mul(self.cfg.suggestions.fetch_multiplier);
		let rows = self
			.sources
			.suggestions
			.fetch_suggestion_candidates(query.trimmed(), fetch_limit)
			.await
			.map_err(|err| {
				tracing::warn!(error = %err, query = query.trimmed(), "Suggestion fetch failed.");

				err
			})?;
		let row_count = rows.len();
		let out = rank_suggestions(
			&query.key(),
			rows,
			limit as usize,
			self.cfg.suggestions.popular_min_frequency,
			&self.popularity,
			&self.sanitizer,
		);

		tracing::debug!(
			query = query.trimmed(),
			row_count,
			returned = out.len(),
			"Suggestions ranked."
		);

		Ok(out)
	}

	/// Counts one run of `query` toward its popularity. Returns the new count.
	pub fn record_search(&self, query: &str) -> u64 {
		self.popularity.record(query)
	}
}

/// Orders rows by tier, then match strength, then popularity, then store order. Duplicate
/// `(text, source_type)` pairs keep their best-ranked occurrence.
pub fn rank_suggestions(
	query_key: &str,
	rows: Vec<SuggestionRow>,
	limit: usize,
	popular_min_frequency: u64,
	popularity: &PopularityCounter,
	sanitizer: &Sanitizer,
) -> Vec<SuggestionCandidate> {
	if limit == 0 || query_key.is_empty() {
		return Vec::new();
	}

	let mut ranked = Vec::with_capacity(rows.len());

	for (input_rank, row) in rows.into_iter().enumerate() {
		let text = plain_suggestion_text(&row.text, sanitizer);

		if text.is_empty() {
			continue;
		}

		let source_type = SourceType::parse(&row.source);
		let frequency = match source_type {
			SourceType::Popular => {
				let stored = row.frequency.map(|value| value.max(0) as u64);
				let live = popularity.frequency(&text);

				stored.max(live)
			},
			_ => None,
		};
		let candidate = SuggestionCandidate::new(text, source_type, frequency);
		let tier = candidate.tier(popular_min_frequency);
		let match_kind = match_kind(query_key, &normalize_text(&candidate.text));

		ranked.push(RankedSuggestion { candidate, tier, match_kind, input_rank });
	}

	ranked.sort_by_key(|item| {
		let frequency = Reverse(item.candidate.frequency.unwrap_or(0));

		(item.tier, item.match_kind, frequency, item.input_rank)
	});

	let mut seen = HashSet::new();
	let mut out = Vec::with_capacity(limit.min(ranked.len()));

	for item in ranked {
		if !seen.insert((normalize_text(&item.candidate.text), item.candidate.source_type)) {
			continue;
		}

		out.push(item.candidate);

		if out.len() >= limit {
			break;
		}
	}

	out
}

fn plain_suggestion_text(raw: &str, sanitizer: &Sanitizer) -> String {
	let plain = if raw.contains('<') || raw.contains('&') {
		sanitizer.strip_to_plain_text(raw)
	} else {
		raw.to_string()
	};

	plain.split_whitespace().collect::<Vec<_>>().join(" ")
}

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
	pub service: Service,
	pub search: Search,
	pub suggestions: Suggestions,
	pub related: Related,
	pub sanitizer: Sanitizer,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Service {
	/// Tracing filter directive used by the embedding application.
	pub log_level: String,
}
impl Default for Service {
	fn default() -> Self {
		Self { log_level: "info".to_string() }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Search {
	/// Queries shorter than this (in characters, after trimming) never reach a retriever.
	pub min_query_chars: u32,
	/// Settle delay between the last keystroke and the suggestion fetch.
	pub debounce_ms: u64,
	/// Pending requests older than this transition to failed.
	pub timeout_ms: u64,
}
impl Default for Search {
	fn default() -> Self {
		Self { min_query_chars: 2, debounce_ms: 200, timeout_ms: 8_000 }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Suggestions {
	pub default_limit: u32,
	pub max_limit: u32,
	/// How many raw rows to request from the store per returned suggestion.
	pub fetch_multiplier: u32,
	/// Popular searches below this frequency fall back to the generic tier.
	pub popular_min_frequency: u64,
}
impl Default for Suggestions {
	fn default() -> Self {
		Self { default_limit: 10, max_limit: 50, fetch_multiplier: 3, popular_min_frequency: 2 }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Related {
	pub default_limit: u32,
	pub max_limit: u32,
	/// Candidate rows requested from the store before scoring.
	pub candidate_k: u32,
	pub highly_relevant_threshold: f32,
	pub category_weight: f32,
	pub document_type_weight: f32,
	pub lexical_weight: f32,
	pub reference_weight: f32,
	/// Upper bound on distinct terms taken from a title or reference for overlap.
	pub max_terms: u32,
}
impl Default for Related {
	fn default() -> Self {
		Self {
			default_limit: 5,
			max_limit: 50,
			candidate_k: 50,
			highly_relevant_threshold: 0.7,
			category_weight: 0.3,
			document_type_weight: 0.1,
			lexical_weight: 0.2,
			reference_weight: 0.4,
			max_terms: 32,
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Sanitizer {
	/// Value forced onto the `rel` attribute of every kept link.
	pub link_rel: Option<String>,
	pub preview_chars: u32,
}
impl Default for Sanitizer {
	fn default() -> Self {
		Self { link_rel: Some("noopener noreferrer".to_string()), preview_chars: 200 }
	}
}

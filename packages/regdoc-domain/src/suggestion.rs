use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
	/// A past search typed often enough to be worth suggesting again.
	Popular,
	Title,
	Reference,
	/// Any source tag this build does not know. Classified as generic.
	#[serde(other)]
	Unknown,
}
impl SourceType {
	pub fn parse(raw: &str) -> Self {
		match raw.trim().to_ascii_lowercase().as_str() {
			"popular" | "popular_search" | "recherche_populaire" => Self::Popular,
			"title" | "titre" => Self::Title,
			"reference" | "official_reference" | "reference_officielle" => Self::Reference,
			_ => Self::Unknown,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Popular => "popular",
			Self::Title => "title",
			Self::Reference => "reference",
			Self::Unknown => "unknown",
		}
	}

	/// Label shown next to a suggestion.
	pub fn label(self) -> &'static str {
		match self {
			Self::Popular => "Recherche populaire",
			Self::Title => "Titre",
			Self::Reference => "Référence",
			Self::Unknown => "Suggestion",
		}
	}
}

/// Display and ranking partition of a suggestion. Lower sorts first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionTier {
	Popular,
	Title,
	Reference,
	Generic,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionCandidate {
	pub text: String,
	pub source_type: SourceType,
	/// Only set for [`SourceType::Popular`].
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub frequency: Option<u64>,
}
impl SuggestionCandidate {
	pub fn new(text: impl Into<String>, source_type: SourceType, frequency: Option<u64>) -> Self {
		let frequency = match source_type {
			SourceType::Popular => frequency,
			_ => None,
		};

		Self { text: text.into(), source_type, frequency }
	}

	pub fn tier(&self, popular_min_frequency: u64) -> SuggestionTier {
		classify(self.source_type, self.frequency, popular_min_frequency)
	}
}

pub fn classify(
	source_type: SourceType,
	frequency: Option<u64>,
	popular_min_frequency: u64,
) -> SuggestionTier {
	match source_type {
		SourceType::Popular if frequency.unwrap_or(0) >= popular_min_frequency =>
			SuggestionTier::Popular,
		SourceType::Popular => SuggestionTier::Generic,
		SourceType::Title => SuggestionTier::Title,
		SourceType::Reference => SuggestionTier::Reference,
		SourceType::Unknown => SuggestionTier::Generic,
	}
}

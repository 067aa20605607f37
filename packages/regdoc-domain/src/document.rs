use std::fmt;

use serde::{Deserialize, Serialize};

use crate::text;

/// Opaque document identifier as handed out by the document store.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);
impl DocumentId {
	pub fn new(raw: impl Into<String>) -> Self {
		Self(raw.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn is_blank(&self) -> bool {
		self.0.trim().is_empty()
	}
}
impl fmt::Display for DocumentId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}
impl From<&str> for DocumentId {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}
impl From<String> for DocumentId {
	fn from(value: String) -> Self {
		Self(value)
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
	Law,
	Decree,
	Order,
	Circular,
	Ordinance,
	Instruction,
	#[serde(other)]
	Other,
}
impl DocumentType {
	/// Accepts both the English tags and the French names used in the document store.
	pub fn parse(raw: &str) -> Self {
		match text::normalize_text(raw).as_str() {
			"law" | "loi" => Self::Law,
			"decree" | "decret" => Self::Decree,
			"order" | "arrete" => Self::Order,
			"circular" | "circulaire" => Self::Circular,
			"ordinance" | "ordonnance" => Self::Ordinance,
			"instruction" | "note de service" => Self::Instruction,
			_ => Self::Other,
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			Self::Law => "Loi",
			Self::Decree => "Décret",
			Self::Order => "Arrêté",
			Self::Circular => "Circulaire",
			Self::Ordinance => "Ordonnance",
			Self::Instruction => "Instruction",
			Self::Other => "Autre",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelatedDocument {
	pub id: DocumentId,
	pub title: String,
	pub official_reference: String,
	pub document_type: DocumentType,
	/// In `[0, 1]`.
	pub similarity_score: f32,
	/// Set when the score is above the configured relevance threshold.
	pub highly_relevant: bool,
}
impl RelatedDocument {
	pub fn is_highly_relevant(&self) -> bool {
		self.highly_relevant
	}
}

/// Splits a ranked list into its highly relevant and ordinary tiers, preserving order.
pub fn split_by_relevance(
	documents: &[RelatedDocument],
) -> (Vec<&RelatedDocument>, Vec<&RelatedDocument>) {
	documents.iter().partition(|doc| doc.is_highly_relevant())
}

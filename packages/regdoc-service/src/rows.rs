use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use regdoc_domain::DocumentId;

/// Suggestion row as returned by the document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionRow {
	pub text: String,
	#[serde(alias = "source_type", alias = "type")]
	pub source: String,
	#[serde(default)]
	pub frequency: Option<i64>,
}
impl SuggestionRow {
	pub fn new(text: impl Into<String>, source: impl Into<String>, frequency: Option<i64>) -> Self {
		Self { text: text.into(), source: source.into(), frequency }
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRow {
	pub id: DocumentId,
	/// May carry inline markup.
	pub title: String,
	#[serde(default, alias = "reference")]
	pub official_reference: String,
	#[serde(default, alias = "type")]
	pub document_type: String,
	#[serde(default)]
	pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedRow {
	#[serde(flatten)]
	pub document: DocumentRow,
	/// A reference between the two documents was declared by hand.
	#[serde(default)]
	pub cross_referenced: bool,
}

/// Decodes rows one at a time so a single malformed row does not hide the rest.
pub fn decode_rows<T>(values: Vec<Value>, label: &str) -> Vec<T>
where
	T: DeserializeOwned,
{
	let mut out = Vec::with_capacity(values.len());

	for (idx, value) in values.into_iter().enumerate() {
		match serde_json::from_value(value) {
			Ok(row) => out.push(row),
			Err(err) => {
				tracing::warn!(error = %err, row_kind = label, row_index = idx, "Dropping malformed row.");
			},
		}
	}

	out
}

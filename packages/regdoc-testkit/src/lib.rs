mod error;

pub use error::{Error, Result};

use std::{
	collections::{HashMap, HashSet},
	sync::Mutex,
	time::Duration,
};

use serde::Deserialize;
use serde_json::Value;
use tokio::time;

use regdoc_domain::{DocumentId, MatchKind, match_kind, normalize_text};
use regdoc_service::{
	BoxFuture, DocumentRow, DocumentSource, RelatedRow, SuggestionRow, SuggestionSource,
	decode_rows,
};

/// Recorded calls, in arrival order.
#[derive(Debug, Default)]
struct Calls {
	suggestions: Vec<String>,
	documents: Vec<DocumentId>,
	related: Vec<DocumentId>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
	#[serde(default)]
	suggestions: Vec<Value>,
	#[serde(default)]
	documents: Vec<Value>,
	#[serde(default)]
	references: Vec<(String, String)>,
}

/// In-memory document store.
///
/// Suggestion calls return stored rows whose text matches the query, in insertion order. Related
/// candidate calls return every stored document, the source itself included, so callers must do
/// their own exclusion. Latency and failures are injected per key: the normalized query text for
/// suggestions, the document id for documents, and `related:<id>` for related candidates.
#[derive(Debug, Default)]
pub struct FixtureCatalog {
	suggestions: Vec<SuggestionRow>,
	documents: Vec<DocumentRow>,
	references: HashSet<(DocumentId, DocumentId)>,
	delays: HashMap<String, Duration>,
	failures: HashSet<String>,
	calls: Mutex<Calls>,
}
impl FixtureCatalog {
	pub fn new() -> Self {
		Self::default()
	}

	/// Loads `{ "suggestions": [..], "documents": [..], "references": [[a, b], ..] }`.
	pub fn from_json(value: Value) -> Result<Self> {
		let file: CatalogFile = serde_json::from_value(value)?;
		let mut catalog = Self::new();

		catalog.suggestions = decode_rows(file.suggestions, "suggestion");
		catalog.documents = decode_rows(file.documents, "document");

		for (lhs, rhs) in file.references {
			if lhs.trim().is_empty() || rhs.trim().is_empty() {
				return Err(Error::Message("Reference ids must not be blank.".to_string()));
			}

			catalog = catalog.with_reference(lhs.as_str(), rhs.as_str());
		}

		Ok(catalog)
	}

	pub fn with_suggestion(mut self, text: &str, source: &str, frequency: Option<i64>) -> Self {
		self.suggestions.push(SuggestionRow::new(text, source, frequency));

		self
	}

	pub fn with_document(
		mut self,
		id: &str,
		title: &str,
		official_reference: &str,
		document_type: &str,
		category: Option<&str>,
	) -> Self {
		self.documents.push(DocumentRow {
			id: DocumentId::new(id),
			title: title.to_string(),
			official_reference: official_reference.to_string(),
			document_type: document_type.to_string(),
			category: category.map(str::to_string),
		});

		self
	}

	/// Declares a manual cross-reference. References are symmetric.
	pub fn with_reference(mut self, lhs: &str, rhs: &str) -> Self {
		self.references.insert((DocumentId::new(lhs), DocumentId::new(rhs)));
		self.references.insert((DocumentId::new(rhs), DocumentId::new(lhs)));

		self
	}

	pub fn with_delay(mut self, key: &str, delay: Duration) -> Self {
		self.delays.insert(fixture_key(key), delay);

		self
	}

	pub fn with_failure(mut self, key: &str) -> Self {
		self.failures.insert(fixture_key(key));

		self
	}

	pub fn suggestion_calls(&self) -> Vec<String> {
		self.lock_calls().suggestions.clone()
	}

	pub fn document_calls(&self) -> Vec<DocumentId> {
		self.lock_calls().documents.clone()
	}

	pub fn related_calls(&self) -> Vec<DocumentId> {
		self.lock_calls().related.clone()
	}

	pub fn related_call_count(&self, id: &str) -> usize {
		self.lock_calls().related.iter().filter(|called| called.as_str() == id).count()
	}

	async fn simulate(&self, key: &str) -> color_eyre::Result<()> {
		let key = fixture_key(key);

		if let Some(delay) = self.delays.get(&key) {
			time::sleep(*delay).await;
		}
		if self.failures.contains(&key) {
			return Err(color_eyre::eyre::eyre!("Fixture store unavailable for {key}."));
		}

		Ok(())
	}

	fn lock_calls(&self) -> std::sync::MutexGuard<'_, Calls> {
		self.calls.lock().unwrap_or_else(|err| err.into_inner())
	}
}

impl SuggestionSource for FixtureCatalog {
	fn fetch_suggestion_candidates<'a>(
		&'a self,
		query_text: &'a str,
		limit: u32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<SuggestionRow>>> {
		Box::pin(async move {
			self.lock_calls().suggestions.push(query_text.to_string());
			self.simulate(query_text).await?;

			let key = normalize_text(query_text);
			let rows = self
				.suggestions
				.iter()
				.filter(|row| match_kind(&key, &normalize_text(&row.text)) != MatchKind::None)
				.take(limit as usize)
				.cloned()
				.collect();

			Ok(rows)
		})
	}
}

impl DocumentSource for FixtureCatalog {
	fn fetch_document<'a>(
		&'a self,
		document_id: &'a DocumentId,
	) -> BoxFuture<'a, color_eyre::Result<Option<DocumentRow>>> {
		Box::pin(async move {
			self.lock_calls().documents.push(document_id.clone());
			self.simulate(document_id.as_str()).await?;

			Ok(self.documents.iter().find(|doc| &doc.id == document_id).cloned())
		})
	}

	fn fetch_related_document_candidates<'a>(
		&'a self,
		document_id: &'a DocumentId,
		limit: u32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<RelatedRow>>> {
		Box::pin(async move {
			self.lock_calls().related.push(document_id.clone());
			self.simulate(&related_key(document_id)).await?;

			let rows = self
				.documents
				.iter()
				.take(limit as usize)
				.map(|doc| {
					let pair = (document_id.clone(), doc.id.clone());

					RelatedRow {
						document: doc.clone(),
						cross_referenced: self.references.contains(&pair),
					}
				})
				.collect();

			Ok(rows)
		})
	}
}

fn fixture_key(raw: &str) -> String {
	normalize_text(raw)
}

pub fn related_key(document_id: &DocumentId) -> String {
	format!("related:{document_id}")
}

pub mod orchestrator;
pub mod popularity;
pub mod related;
pub mod rows;
pub mod suggest;

mod error;

pub use error::{Error, Result};
pub use orchestrator::{
	Lane, RelatedDocumentsSession, RelatedDocumentsState, RequestState, SuggestionSession,
	SuggestionState, Ticket,
};
pub use popularity::PopularityCounter;
pub use rows::{DocumentRow, RelatedRow, SuggestionRow, decode_rows};

use std::{future::Future, pin::Pin, sync::Arc};

use regdoc_config::Config;
use regdoc_domain::DocumentId;
use regdoc_sanitize::Sanitizer;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Backing store for suggestion candidates.
pub trait SuggestionSource
where
	Self: Send + Sync,
{
	fn fetch_suggestion_candidates<'a>(
		&'a self,
		query_text: &'a str,
		limit: u32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<SuggestionRow>>>;
}

/// Backing store for documents and their related candidates.
pub trait DocumentSource
where
	Self: Send + Sync,
{
	fn fetch_document<'a>(
		&'a self,
		document_id: &'a DocumentId,
	) -> BoxFuture<'a, color_eyre::Result<Option<DocumentRow>>>;

	fn fetch_related_document_candidates<'a>(
		&'a self,
		document_id: &'a DocumentId,
		limit: u32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<RelatedRow>>>;
}

#[derive(Clone)]
pub struct Sources {
	pub suggestions: Arc<dyn SuggestionSource>,
	pub documents: Arc<dyn DocumentSource>,
}
impl Sources {
	pub fn new(suggestions: Arc<dyn SuggestionSource>, documents: Arc<dyn DocumentSource>) -> Self {
		Self { suggestions, documents }
	}

	/// Both roles served by one store.
	pub fn shared<S>(store: Arc<S>) -> Self
	where
		S: SuggestionSource + DocumentSource + 'static,
	{
		Self { suggestions: store.clone(), documents: store }
	}
}

pub struct SearchService {
	pub cfg: Config,
	pub sources: Sources,
	popularity: Arc<PopularityCounter>,
	sanitizer: Sanitizer,
}
impl SearchService {
	/// Reads popularity from the process-wide counter.
	pub fn new(cfg: Config, sources: Sources) -> Self {
		Self::with_popularity(cfg, sources, PopularityCounter::global())
	}

	pub fn with_popularity(
		cfg: Config,
		sources: Sources,
		popularity: Arc<PopularityCounter>,
	) -> Self {
		let sanitizer = Sanitizer::new(&cfg.sanitizer);

		Self { cfg, sources, popularity, sanitizer }
	}

	pub fn popularity(&self) -> &Arc<PopularityCounter> {
		&self.popularity
	}

	pub fn sanitizer(&self) -> &Sanitizer {
		&self.sanitizer
	}

	pub fn sanitize(&self, html: &str) -> String {
		self.sanitizer.sanitize(html)
	}

	pub fn strip_to_plain_text(&self, html: &str) -> String {
		self.sanitizer.strip_to_plain_text(html)
	}
}

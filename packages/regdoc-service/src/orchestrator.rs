//! Decides when the retrievers run.
//!
//! Each surface owns one [`Lane`] keyed by request identity: the normalized query text for the
//! search box, the document id for the related-documents panel. Lanes enforce last-request-wins,
//! join in-flight retrievals for the same key, bound every retrieval by the configured timeout,
//! and publish their state over a `watch` channel.

mod lane;

pub use lane::{Lane, RequestState, Ticket};

use std::{
	sync::{
		Arc,
		atomic::{AtomicBool, Ordering},
	},
	time::Duration,
};

use tokio::{sync::watch, time};

use regdoc_domain::{DocumentId, RelatedDocument, SearchQuery, SuggestionCandidate};

use crate::SearchService;

pub type SuggestionState = RequestState<String, Vec<SuggestionCandidate>>;
pub type RelatedDocumentsState = RequestState<DocumentId, Vec<RelatedDocument>>;

/// Search box driver: debounces keystrokes, then fetches suggestions for the latest query.
pub struct SuggestionSession {
	service: Arc<SearchService>,
	lane: Lane<String, Vec<SuggestionCandidate>>,
	open: AtomicBool,
	limit: u32,
	debounce: Duration,
}
impl SuggestionSession {
	/// Starts open, with the configured default limit.
	pub fn new(service: Arc<SearchService>) -> Self {
		let search = &service.cfg.search;
		let lane = Lane::new("suggestions", Duration::from_millis(search.timeout_ms));
		let debounce = Duration::from_millis(search.debounce_ms);
		let limit = service.cfg.suggestions.default_limit;

		Self { service, lane, open: AtomicBool::new(true), limit, debounce }
	}

	pub fn with_limit(mut self, limit: u32) -> Self {
		self.limit = limit;

		self
	}

	pub fn subscribe(&self) -> watch::Receiver<SuggestionState> {
		self.lane.subscribe()
	}

	pub fn state(&self) -> SuggestionState {
		self.lane.snapshot()
	}

	pub fn is_open(&self) -> bool {
		self.open.load(Ordering::Acquire)
	}

	/// Closing the suggestion surface drops any outstanding request and returns to `Idle`.
	pub fn set_open(&self, open: bool) {
		self.open.store(open, Ordering::Release);

		if !open {
			self.lane.reset();
		}
	}

	/// Feeds the current search box text.
	///
	/// Resolves once this keystroke's request settles, is superseded, or is gated off. Returns
	/// the state this call published, if any.
	pub async fn input(&self, text: &str) -> Option<SuggestionState> {
		let query =
			SearchQuery::new(text).with_min_length(self.service.cfg.search.min_query_chars);

		if !self.is_open() || !query.is_retrievable() {
			self.lane.reset();

			return None;
		}

		let ticket = self.lane.begin(query.key())?;

		tokio::select! {
			_ = ticket.cancelled() => return None,
			_ = time::sleep(self.debounce) => {},
		}

		let service = Arc::clone(&self.service);
		let query_text = query.trimmed().to_string();
		let limit = self.limit;

		self.lane
			.run(&ticket, move || {
				Box::pin(async move { service.get_suggestions(&query_text, limit).await })
			})
			.await
	}

	/// Records a submitted search so later suggestions can rank it as popular.
	pub fn submit(&self, text: &str) -> u64 {
		self.service.record_search(text)
	}
}

/// Related-documents panel driver. Fetches as soon as a document is shown; there is nothing to
/// debounce.
pub struct RelatedDocumentsSession {
	service: Arc<SearchService>,
	lane: Lane<DocumentId, Vec<RelatedDocument>>,
	visible: AtomicBool,
	limit: u32,
}
impl RelatedDocumentsSession {
	/// Starts visible, with the configured default limit.
	pub fn new(service: Arc<SearchService>) -> Self {
		let lane =
			Lane::new("related_documents", Duration::from_millis(service.cfg.search.timeout_ms));
		let limit = service.cfg.related.default_limit;

		Self { service, lane, visible: AtomicBool::new(true), limit }
	}

	pub fn with_limit(mut self, limit: u32) -> Self {
		self.limit = limit;

		self
	}

	pub fn subscribe(&self) -> watch::Receiver<RelatedDocumentsState> {
		self.lane.subscribe()
	}

	pub fn state(&self) -> RelatedDocumentsState {
		self.lane.snapshot()
	}

	pub fn is_visible(&self) -> bool {
		self.visible.load(Ordering::Acquire)
	}

	pub fn set_visible(&self, visible: bool) {
		self.visible.store(visible, Ordering::Release);

		if !visible {
			self.lane.reset();
		}
	}

	/// Shows `document_id` in the panel. Returns the state this call published, if any.
	pub async fn show(&self, document_id: DocumentId) -> Option<RelatedDocumentsState> {
		if !self.is_visible() || document_id.is_blank() {
			self.lane.reset();

			return None;
		}

		let ticket = self.lane.begin(document_id.clone())?;
		let service = Arc::clone(&self.service);
		let limit = self.limit;

		self.lane
			.run(&ticket, move || {
				Box::pin(async move { service.get_related_documents(&document_id, limit).await })
			})
			.await
	}
}

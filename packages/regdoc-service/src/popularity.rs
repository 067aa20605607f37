//! Process-wide search popularity.
//!
//! Writers record a query each time it is actually run. Readers (the suggestion retriever) only
//! ever try the lock: if a writer holds it, the read reports "unknown" and the retriever falls back
//! to the frequency carried by the store row. Reads are therefore eventually consistent and never
//! wait on writers.

use std::{
	collections::HashMap,
	sync::{Arc, LazyLock, RwLock, TryLockError},
};

use regdoc_domain::normalize_text;

static GLOBAL: LazyLock<Arc<PopularityCounter>> =
	LazyLock::new(|| Arc::new(PopularityCounter::new()));

#[derive(Debug, Default)]
pub struct PopularityCounter {
	counts: RwLock<HashMap<String, u64>>,
}
impl PopularityCounter {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn global() -> Arc<Self> {
		Arc::clone(&GLOBAL)
	}

	/// Returns the new count. Blank queries are ignored.
	pub fn record(&self, query: &str) -> u64 {
		let key = normalize_text(query);

		if key.is_empty() {
			return 0;
		}

		let mut counts = self.counts.write().unwrap_or_else(|err| err.into_inner());
		let count = counts.entry(key).or_insert(0);

		*count = count.saturating_add(1);

		*count
	}

	/// `None` when the query was never recorded or a writer currently holds the lock.
	pub fn frequency(&self, query: &str) -> Option<u64> {
		let key = normalize_text(query);
		let counts = match self.counts.try_read() {
			Ok(counts) => counts,
			Err(TryLockError::Poisoned(err)) => err.into_inner(),
			Err(TryLockError::WouldBlock) => {
				tracing::debug!("Popularity read skipped while a writer holds the lock.");

				return None;
			},
		};

		counts.get(&key).copied()
	}

	pub fn len(&self) -> usize {
		self.counts.read().unwrap_or_else(|err| err.into_inner()).len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

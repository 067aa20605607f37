use std::{
	collections::HashMap,
	fmt::Debug,
	hash::Hash,
	sync::{Arc, Mutex, MutexGuard},
	time::Duration,
};

use futures::{FutureExt, future::Shared};
use tokio::{sync::watch, time};
use tokio_util::sync::CancellationToken;

use crate::{BoxFuture, Error, Result};

type SharedFetch<V> = Shared<BoxFuture<'static, Result<V>>>;

/// Observable state of one lane. `Resolved` with an empty value means "nothing found", which is
/// different from `Idle` or `Pending`.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestState<K, V> {
	Idle,
	Pending { key: K },
	Resolved { key: K, value: V },
	Failed { key: K, error: Error },
}
impl<K, V> RequestState<K, V> {
	pub fn key(&self) -> Option<&K> {
		match self {
			Self::Idle => None,
			Self::Pending { key } | Self::Resolved { key, .. } | Self::Failed { key, .. } =>
				Some(key),
		}
	}

	pub fn value(&self) -> Option<&V> {
		match self {
			Self::Resolved { value, .. } => Some(value),
			_ => None,
		}
	}

	pub fn error(&self) -> Option<&Error> {
		match self {
			Self::Failed { error, .. } => Some(error),
			_ => None,
		}
	}

	pub fn is_idle(&self) -> bool {
		matches!(self, Self::Idle)
	}

	pub fn is_pending(&self) -> bool {
		matches!(self, Self::Pending { .. })
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Idle => "idle",
			Self::Pending { .. } => "pending",
			Self::Resolved { .. } => "resolved",
			Self::Failed { .. } => "failed",
		}
	}
}

/// One issued request. Stale as soon as the lane begins another request or resets.
///
/// Dropping a ticket whose request is still `Pending` returns the lane to `Idle`, so a caller that
/// gives up mid-debounce or mid-fetch never leaves the lane waiting on work nobody is doing.
pub struct Ticket<K, V> {
	generation: u64,
	key: K,
	token: CancellationToken,
	lane: Arc<LaneShared<K, V>>,
}
impl<K, V> Ticket<K, V> {
	pub fn key(&self) -> &K {
		&self.key
	}

	pub fn generation(&self) -> u64 {
		self.generation
	}

	pub fn is_cancelled(&self) -> bool {
		self.token.is_cancelled()
	}

	pub async fn cancelled(&self) {
		self.token.cancelled().await
	}
}
impl<K, V> Drop for Ticket<K, V> {
	fn drop(&mut self) {
		let mut inner = self.lane.lock();

		if inner.generation != self.generation || !self.lane.state.borrow().is_pending() {
			return;
		}

		inner.supersede();

		self.lane.state.send_replace(RequestState::Idle);

		tracing::debug!(lane = self.lane.label, "Request dropped before it settled.");
	}
}

struct InFlight<V> {
	id: u64,
	fetch: SharedFetch<V>,
}

struct LaneInner<K, V> {
	generation: u64,
	current: Option<K>,
	token: CancellationToken,
	next_fetch_id: u64,
	in_flight: HashMap<K, InFlight<V>>,
}
impl<K, V> LaneInner<K, V> {
	/// Invalidates every outstanding ticket.
	fn supersede(&mut self) {
		self.generation += 1;
		self.token.cancel();
		self.token = CancellationToken::new();
		self.current = None;
	}
}

/// State shared by a lane, its tickets, and its background fetch drivers.
struct LaneShared<K, V> {
	label: &'static str,
	state: watch::Sender<RequestState<K, V>>,
	inner: Mutex<LaneInner<K, V>>,
}
impl<K, V> LaneShared<K, V> {
	fn lock(&self) -> MutexGuard<'_, LaneInner<K, V>> {
		self.inner.lock().unwrap_or_else(|err| err.into_inner())
	}
}

/// Last-request-wins coordination for one kind of retrieval.
///
/// Every [`Lane::begin`] bumps a generation counter and cancels the previous ticket's token;
/// results are only published while their ticket's generation is still current. Retrievals are
/// shared per key, so a second request for a key whose fetch has not settled joins it instead of
/// calling the store again. Each fetch is driven to completion in the background even when every
/// waiter has lost interest, and leaves the in-flight table once it settles or times out.
pub struct Lane<K, V> {
	timeout: Duration,
	shared: Arc<LaneShared<K, V>>,
}
impl<K, V> Lane<K, V>
where
	K: Clone + Eq + Hash + Debug + Send + Sync + 'static,
	V: Clone + Send + Sync + 'static,
{
	pub fn new(label: &'static str, timeout: Duration) -> Self {
		let (state, _) = watch::channel(RequestState::Idle);
		let inner = Mutex::new(LaneInner {
			generation: 0,
			current: None,
			token: CancellationToken::new(),
			next_fetch_id: 0,
			in_flight: HashMap::new(),
		});

		Self { timeout, shared: Arc::new(LaneShared { label, state, inner }) }
	}

	pub fn subscribe(&self) -> watch::Receiver<RequestState<K, V>> {
		self.shared.state.subscribe()
	}

	pub fn snapshot(&self) -> RequestState<K, V> {
		self.shared.state.borrow().clone()
	}

	pub fn in_flight_len(&self) -> usize {
		self.shared.lock().in_flight.len()
	}

	/// Moves the lane to `Pending` for `key` and returns the ticket to run it with.
	///
	/// Returns `None` when `key` is already pending or resolved, so repeated requests for an
	/// unchanged key do no new work. A pending key always has a live ticket behind it. A failed
	/// key may be retried.
	pub fn begin(&self, key: K) -> Option<Ticket<K, V>> {
		let mut inner = self.shared.lock();
		let unchanged = inner.current.as_ref() == Some(&key)
			&& matches!(
				*self.shared.state.borrow(),
				RequestState::Pending { .. } | RequestState::Resolved { .. }
			);

		if unchanged {
			tracing::debug!(lane = self.shared.label, key = ?key, "Request key unchanged.");

			return None;
		}

		inner.supersede();
		inner.current = Some(key.clone());

		self.shared.state.send_replace(RequestState::Pending { key: key.clone() });

		Some(Ticket {
			generation: inner.generation,
			key,
			token: inner.token.clone(),
			lane: Arc::clone(&self.shared),
		})
	}

	/// Drops interest in whatever is outstanding and returns to `Idle`.
	pub fn reset(&self) {
		let mut inner = self.shared.lock();

		inner.supersede();

		self.shared.state.send_if_modified(|state| {
			if state.is_idle() {
				return false;
			}

			*state = RequestState::Idle;

			true
		});
	}

	pub fn is_current(&self, ticket: &Ticket<K, V>) -> bool {
		self.shared.lock().generation == ticket.generation
	}

	/// Waits for the ticket's retrieval and publishes the outcome if the ticket is still current.
	///
	/// `fetch` is only called when no retrieval for the same key is in flight. Returns the
	/// published state, or `None` when the outcome was discarded.
	pub async fn run<F>(&self, ticket: &Ticket<K, V>, fetch: F) -> Option<RequestState<K, V>>
	where
		F: FnOnce() -> BoxFuture<'static, Result<V>>,
	{
		let (fetch_id, shared) = {
			let mut inner = self.shared.lock();

			if inner.generation != ticket.generation {
				return None;
			}

			self.join_or_start(&mut inner, &ticket.key, fetch)
		};
		let outcome = tokio::select! {
			_ = ticket.token.cancelled() => return self.discard(ticket),
			result = time::timeout(self.timeout, shared) => match result {
				Ok(result) => result,
				Err(_) => Err(Error::Timeout { timeout_ms: self.timeout.as_millis() as u64 }),
			},
		};

		self.publish(ticket, fetch_id, outcome)
	}

	fn join_or_start<F>(
		&self,
		inner: &mut LaneInner<K, V>,
		key: &K,
		fetch: F,
	) -> (u64, SharedFetch<V>)
	where
		F: FnOnce() -> BoxFuture<'static, Result<V>>,
	{
		if let Some(existing) = inner.in_flight.get(key) {
			tracing::debug!(lane = self.shared.label, key = ?key, "Joining in-flight request.");

			return (existing.id, existing.fetch.clone());
		}

		let id = inner.next_fetch_id;

		inner.next_fetch_id += 1;

		let shared = fetch().shared();

		inner.in_flight.insert(key.clone(), InFlight { id, fetch: shared.clone() });

		let driver = shared.clone();
		let lane = Arc::clone(&self.shared);
		let key = key.clone();
		let timeout = self.timeout;

		tokio::spawn(async move {
			if time::timeout(timeout, driver).await.is_err() {
				tracing::warn!(
					lane = lane.label,
					key = ?key,
					"In-flight request abandoned after timeout."
				);
			}

			evict(&mut lane.lock(), &key, id);
		});

		(id, shared)
	}

	fn discard(&self, ticket: &Ticket<K, V>) -> Option<RequestState<K, V>> {
		tracing::debug!(lane = self.shared.label, key = ?ticket.key, "Request superseded.");

		None
	}

	fn publish(
		&self,
		ticket: &Ticket<K, V>,
		fetch_id: u64,
		outcome: Result<V>,
	) -> Option<RequestState<K, V>> {
		let mut inner = self.shared.lock();

		// Settled or timed out; a later request for this key must start a fresh fetch.
		evict(&mut inner, &ticket.key, fetch_id);

		if inner.generation != ticket.generation {
			tracing::debug!(
				lane = self.shared.label,
				key = ?ticket.key,
				"Discarding stale response."
			);

			return None;
		}

		let key = ticket.key.clone();
		let state = match outcome {
			Ok(value) => RequestState::Resolved { key, value },
			Err(error) => {
				tracing::warn!(
					lane = self.shared.label,
					key = ?key,
					error = %error,
					"Retrieval failed."
				);

				RequestState::Failed { key, error }
			},
		};

		self.shared.state.send_replace(state.clone());

		drop(inner);

		Some(state)
	}
}

fn evict<K, V>(inner: &mut LaneInner<K, V>, key: &K, id: u64)
where
	K: Eq + Hash,
{
	if inner.in_flight.get(key).is_some_and(|entry| entry.id == id) {
		inner.in_flight.remove(key);
	}
}

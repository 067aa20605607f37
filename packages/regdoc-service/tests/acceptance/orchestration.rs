use std::{sync::Arc, time::Duration};

use tokio::time;

use regdoc_domain::DocumentId;
use regdoc_service::{Error, RelatedDocumentsSession, RequestState, SuggestionSession};

#[tokio::test(start_paused = true)]
async fn newer_document_wins_when_older_resolves_last() {
	let catalog = Arc::new(
		super::legal_catalog()
			.with_delay("lf-2024", Duration::from_millis(500))
			.with_delay("lfr-2024", Duration::from_millis(50)),
	);
	let service = super::build_service(super::test_config(), &catalog);
	let session = Arc::new(RelatedDocumentsSession::new(service));
	let first = {
		let session = Arc::clone(&session);

		tokio::spawn(async move { session.show(DocumentId::new("lf-2024")).await })
	};

	time::sleep(Duration::from_millis(1)).await;

	let second = {
		let session = Arc::clone(&session);

		tokio::spawn(async move { session.show(DocumentId::new("lfr-2024")).await })
	};
	let second = second.await.expect("Second show panicked.");
	let first = first.await.expect("First show panicked.");

	assert!(first.is_none());
	assert!(matches!(
		second,
		Some(RequestState::Resolved { ref key, .. }) if key.as_str() == "lfr-2024"
	));

	// Let the older fetch finish in the background; it must not overwrite the newer result.
	time::sleep(Duration::from_secs(1)).await;

	let state = session.state();

	assert_eq!(state.key().map(DocumentId::as_str), Some("lfr-2024"));
	assert!(
		state.value().is_some_and(|docs| docs.iter().all(|doc| doc.id.as_str() != "lfr-2024"))
	);
}

#[tokio::test(start_paused = true)]
async fn returning_to_a_pending_document_joins_its_fetch() {
	let catalog = Arc::new(
		super::legal_catalog()
			.with_delay("lf-2024", Duration::from_millis(500))
			.with_delay("lfr-2024", Duration::from_millis(50)),
	);
	let service = super::build_service(super::test_config(), &catalog);
	let session = Arc::new(RelatedDocumentsSession::new(service));
	let show = |id: &'static str| {
		let session = Arc::clone(&session);

		tokio::spawn(async move { session.show(DocumentId::new(id)).await })
	};
	let first = show("lf-2024");

	time::sleep(Duration::from_millis(10)).await;

	let detour = show("lfr-2024");

	time::sleep(Duration::from_millis(10)).await;

	let back = show("lf-2024").await.expect("Show panicked.");

	assert!(first.await.expect("Show panicked.").is_none());
	assert!(detour.await.expect("Show panicked.").is_none());
	assert!(matches!(
		back,
		Some(RequestState::Resolved { ref key, .. }) if key.as_str() == "lf-2024"
	));

	let lf_calls =
		catalog.document_calls().iter().filter(|id| id.as_str() == "lf-2024").count();

	assert_eq!(lf_calls, 1);
}

#[tokio::test(start_paused = true)]
async fn repeated_show_of_pending_document_issues_one_call() {
	let catalog =
		Arc::new(super::legal_catalog().with_delay("lf-2024", Duration::from_millis(100)));
	let service = super::build_service(super::test_config(), &catalog);
	let session = Arc::new(RelatedDocumentsSession::new(service));
	let first = {
		let session = Arc::clone(&session);

		tokio::spawn(async move { session.show(DocumentId::new("lf-2024")).await })
	};

	time::sleep(Duration::from_millis(10)).await;

	assert!(session.state().is_pending());
	assert!(session.show(DocumentId::new("lf-2024")).await.is_none());
	assert!(first.await.expect("Show panicked.").is_some());
	assert!(session.show(DocumentId::new("lf-2024")).await.is_none());
	assert_eq!(catalog.document_calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn keystrokes_are_debounced_to_the_latest_query() {
	let catalog = Arc::new(super::legal_catalog());
	let service = super::build_service(super::test_config(), &catalog);
	let session = Arc::new(SuggestionSession::new(service));
	let mut handles = Vec::new();

	for text in ["l", "lo", "loi"] {
		let session = Arc::clone(&session);

		handles.push(tokio::spawn(async move { session.input(text).await }));

		time::sleep(Duration::from_millis(50)).await;
	}

	let mut published = Vec::new();

	for handle in handles {
		published.push(handle.await.expect("Input panicked."));
	}

	assert!(published[0].is_none());
	assert!(published[1].is_none());
	assert_eq!(catalog.suggestion_calls(), vec!["loi".to_string()]);

	let state = session.state();

	assert_eq!(state.key().map(String::as_str), Some("loi"));
	assert_eq!(state.value().map(Vec::len), Some(2));
}

#[tokio::test(start_paused = true)]
async fn slow_store_times_out_as_failed() {
	let catalog = Arc::new(super::legal_catalog().with_delay("loi", Duration::from_secs(10)));
	let service = super::build_service(super::test_config(), &catalog);
	let session = SuggestionSession::new(service);
	let published = session.input("loi").await;

	assert_eq!(
		published,
		Some(RequestState::Failed {
			key: "loi".to_string(),
			error: Error::Timeout { timeout_ms: 8_000 },
		})
	);
	assert_eq!(session.state(), published.expect("State should be published."));
}

#[tokio::test(start_paused = true)]
async fn store_failure_surfaces_as_failed_state() {
	let catalog = Arc::new(super::legal_catalog().with_failure("lf-2024"));
	let service = super::build_service(super::test_config(), &catalog);
	let session = RelatedDocumentsSession::new(service);

	session.show(DocumentId::new("lf-2024")).await;

	assert!(matches!(session.state().error(), Some(Error::Retrieval { .. })));

	// A failed key may be retried.
	session.show(DocumentId::new("lf-2024")).await;

	assert_eq!(catalog.document_calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn empty_result_is_resolved_not_idle() {
	let catalog = Arc::new(super::legal_catalog());
	let service = super::build_service(super::test_config(), &catalog);
	let session = SuggestionSession::new(service);

	session.input("zzz").await;

	assert_eq!(
		session.state(),
		RequestState::Resolved { key: "zzz".to_string(), value: Vec::new() }
	);
}

#[tokio::test(start_paused = true)]
async fn closing_the_surface_returns_to_idle() {
	let catalog = Arc::new(super::legal_catalog());
	let service = super::build_service(super::test_config(), &catalog);
	let session = SuggestionSession::new(service);
	let mut updates = session.subscribe();

	session.input("loi").await;

	assert!(updates.has_changed().expect("Sender dropped."));
	assert_eq!(updates.borrow_and_update().as_str(), "resolved");

	session.set_open(false);

	assert!(session.state().is_idle());
	assert!(session.input("loi de").await.is_none());
	assert!(session.state().is_idle());
	assert_eq!(catalog.suggestion_calls().len(), 1);

	session.set_open(true);
	session.input("l").await;

	assert!(session.state().is_idle());
}

#[tokio::test(start_paused = true)]
async fn unchanged_query_key_does_not_refetch() {
	let catalog = Arc::new(super::legal_catalog());
	let service = super::build_service(super::test_config(), &catalog);
	let session = SuggestionSession::new(service);

	assert!(session.input("loi").await.is_some());
	assert!(session.input(" Loi ").await.is_none());
	assert_eq!(catalog.suggestion_calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn hiding_the_panel_drops_pending_results() {
	let catalog =
		Arc::new(super::legal_catalog().with_delay("lf-2024", Duration::from_millis(100)));
	let service = super::build_service(super::test_config(), &catalog);
	let session = Arc::new(RelatedDocumentsSession::new(service));
	let pending = {
		let session = Arc::clone(&session);

		tokio::spawn(async move { session.show(DocumentId::new("lf-2024")).await })
	};

	time::sleep(Duration::from_millis(10)).await;
	session.set_visible(false);

	assert!(pending.await.expect("Show panicked.").is_none());
	assert!(session.state().is_idle());
	assert!(session.show(DocumentId::new("lf-2024")).await.is_none());
	assert!(session.state().is_idle());
}

#[tokio::test(start_paused = true)]
async fn abandoned_keystroke_does_not_block_the_same_query() {
	let catalog = Arc::new(super::legal_catalog());
	let service = super::build_service(super::test_config(), &catalog);
	let session = SuggestionSession::new(service);
	let abandoned = time::timeout(Duration::from_millis(50), session.input("loi")).await;

	assert!(abandoned.is_err());
	assert!(session.state().is_idle());

	let again = session.input("loi").await;

	assert!(matches!(again, Some(RequestState::Resolved { ref key, .. }) if key == "loi"));
	assert_eq!(catalog.suggestion_calls(), vec!["loi".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn abandoned_fetch_is_joined_by_the_next_request() {
	let catalog =
		Arc::new(super::legal_catalog().with_delay("lf-2024", Duration::from_millis(500)));
	let service = super::build_service(super::test_config(), &catalog);
	let session = RelatedDocumentsSession::new(service);
	let abandoned =
		time::timeout(Duration::from_millis(100), session.show(DocumentId::new("lf-2024"))).await;

	assert!(abandoned.is_err());
	assert!(session.state().is_idle());
	assert!(session.show(DocumentId::new("lf-2024")).await.is_some());
	assert_eq!(catalog.document_calls().len(), 1);
	assert!(session.state().value().is_some_and(|docs| !docs.is_empty()));
}

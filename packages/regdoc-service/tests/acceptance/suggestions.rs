use std::sync::Arc;

use regdoc_domain::SourceType;
use regdoc_service::Error;
use regdoc_testkit::FixtureCatalog;

#[tokio::test]
async fn popular_entry_ranks_before_title() {
	let catalog = Arc::new(super::legal_catalog());
	let service = super::build_service(super::test_config(), &catalog);
	let out = service.get_suggestions("loi", 10).await.expect("get_suggestions failed.");
	let texts: Vec<&str> = out.iter().map(|candidate| candidate.text.as_str()).collect();

	assert_eq!(texts, vec!["loi de finances", "Loi organique"]);
	assert_eq!(out[0].source_type, SourceType::Popular);
	assert_eq!(out[0].frequency, Some(5));
	assert_eq!(out[1].source_type, SourceType::Title);
	assert_eq!(catalog.suggestion_calls(), vec!["loi".to_string()]);
}

#[tokio::test]
async fn short_query_never_reaches_the_store() {
	let catalog = Arc::new(super::legal_catalog());
	let service = super::build_service(super::test_config(), &catalog);

	for query in ["", " ", "l", "  l  "] {
		let out = service.get_suggestions(query, 10).await.expect("get_suggestions failed.");

		assert!(out.is_empty());
	}

	assert!(catalog.suggestion_calls().is_empty());
}

#[tokio::test]
async fn limits_are_clamped() {
	let catalog = Arc::new(super::legal_catalog());
	let mut cfg = super::test_config();

	cfg.suggestions.max_limit = 1;

	let service = super::build_service(cfg, &catalog);
	let out = service.get_suggestions("loi", 10).await.expect("get_suggestions failed.");

	assert_eq!(out.len(), 1);
	assert!(service.get_suggestions("loi", 0).await.expect("get_suggestions failed.").is_empty());
	assert_eq!(catalog.suggestion_calls().len(), 1);
}

#[tokio::test]
async fn store_failure_is_reported_as_retrieval_error() {
	let catalog = Arc::new(super::legal_catalog().with_failure("loi"));
	let service = super::build_service(super::test_config(), &catalog);
	let err = service.get_suggestions("loi", 10).await.expect_err("Expected a retrieval error.");

	assert!(matches!(err, Error::Retrieval { .. }));
	assert!(err.is_transient());
}

#[tokio::test]
async fn recorded_searches_promote_popular_entries() {
	let catalog = Arc::new(
		FixtureCatalog::new()
			.with_suggestion("Loi organique", "title", None)
			.with_suggestion("loi climat", "popular", Some(1)),
	);
	let service = super::build_service(super::test_config(), &catalog);
	let before = service.get_suggestions("loi", 10).await.expect("get_suggestions failed.");

	assert_eq!(before[0].text, "Loi organique");

	for _ in 0..3 {
		service.record_search("Loi Climat");
	}

	let after = service.get_suggestions("loi", 10).await.expect("get_suggestions failed.");

	assert_eq!(after[0].text, "loi climat");
	assert_eq!(after[0].frequency, Some(3));
}

#[tokio::test]
async fn markup_in_store_rows_is_removed() {
	let catalog = Arc::new(
		FixtureCatalog::new()
			.with_suggestion("Décret <img src=x onerror=alert(1)>relatif", "title", None),
	);
	let service = super::build_service(super::test_config(), &catalog);
	let out = service.get_suggestions("décret", 10).await.expect("get_suggestions failed.");

	assert_eq!(out.len(), 1);
	assert_eq!(out[0].text, "Décret relatif");
}

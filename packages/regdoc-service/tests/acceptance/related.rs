use std::sync::Arc;

use regdoc_domain::{DocumentId, DocumentType, split_by_relevance};
use regdoc_service::Error;
use regdoc_testkit::related_key;

#[tokio::test]
async fn related_documents_are_ranked_and_exclude_the_source() {
	let catalog = Arc::new(super::legal_catalog());
	let service = super::build_service(super::test_config(), &catalog);
	let out = service
		.get_related_documents(&DocumentId::new("lf-2024"), 10)
		.await
		.expect("get_related_documents failed.");
	let ids: Vec<&str> = out.iter().map(|doc| doc.id.as_str()).collect();

	assert_eq!(ids, vec!["lfr-2024", "circ-budget", "arr-nom"]);
	assert!(out.iter().all(|doc| (0.0..=1.0).contains(&doc.similarity_score)));
	assert!(out.windows(2).all(|pair| pair[0].similarity_score >= pair[1].similarity_score));
	assert_eq!(out[0].document_type, DocumentType::Law);
	assert_eq!(out[0].official_reference, "Loi n° 2024-1");

	let (highly_relevant, others) = split_by_relevance(&out);

	assert_eq!(highly_relevant.len(), 1);
	assert_eq!(highly_relevant[0].id.as_str(), "lfr-2024");
	assert_eq!(others.len(), 2);
}

#[tokio::test]
async fn related_limit_cuts_both_tiers() {
	let catalog = Arc::new(super::legal_catalog());
	let service = super::build_service(super::test_config(), &catalog);
	let out = service
		.get_related_documents(&DocumentId::new("lf-2024"), 2)
		.await
		.expect("get_related_documents failed.");

	assert_eq!(out.len(), 2);
	assert!(out[0].highly_relevant);
	assert!(!out[1].highly_relevant);
}

#[tokio::test]
async fn unknown_document_yields_empty_list() {
	let catalog = Arc::new(super::legal_catalog());
	let service = super::build_service(super::test_config(), &catalog);
	let out = service
		.get_related_documents(&DocumentId::new("missing"), 10)
		.await
		.expect("get_related_documents failed.");

	assert!(out.is_empty());
	assert!(catalog.related_calls().is_empty());
}

#[tokio::test]
async fn blank_document_id_never_reaches_the_store() {
	let catalog = Arc::new(super::legal_catalog());
	let service = super::build_service(super::test_config(), &catalog);
	let out = service
		.get_related_documents(&DocumentId::new("  "), 10)
		.await
		.expect("get_related_documents failed.");

	assert!(out.is_empty());
	assert!(catalog.document_calls().is_empty());
}

#[tokio::test]
async fn store_failure_is_reported_as_retrieval_error() {
	let catalog = Arc::new(super::legal_catalog().with_failure("lf-2024"));
	let service = super::build_service(super::test_config(), &catalog);
	let err = service
		.get_related_documents(&DocumentId::new("lf-2024"), 10)
		.await
		.expect_err("Expected a retrieval error.");

	assert!(matches!(err, Error::Retrieval { .. }));
}

#[tokio::test]
async fn candidate_fetch_failure_is_reported_after_the_source_loads() {
	let id = DocumentId::new("lf-2024");
	let catalog = Arc::new(super::legal_catalog().with_failure(&related_key(&id)));
	let service = super::build_service(super::test_config(), &catalog);
	let err =
		service.get_related_documents(&id, 10).await.expect_err("Expected a retrieval error.");

	assert!(matches!(err, Error::Retrieval { .. }));
	assert_eq!(catalog.document_calls(), vec![id.clone()]);
	assert_eq!(catalog.related_call_count("lf-2024"), 1);
}

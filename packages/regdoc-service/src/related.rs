mod scoring;

pub use scoring::{
	RelationSignals, SourceProfile, exceeds_threshold, rank_related, similarity_score,
};

use regdoc_domain::{DocumentId, RelatedDocument};

use crate::{Result, SearchService};

impl SearchService {
	/// Documents related to `document_id`, best first, at most `limit` of them.
	///
	/// An unknown or blank id yields an empty list. The source document never appears in its own
	/// results.
	pub async fn get_related_documents(
		&self,
		document_id: &DocumentId,
		limit: u32,
	) -> Result<Vec<RelatedDocument>> {
		let limit = limit.min(self.cfg.related.max_limit);

		if limit == 0 || document_id.is_blank() {
			return Ok(Vec::new());
		}

		let source =
			self.sources.documents.fetch_document(document_id).await.map_err(|err| {
				tracing::warn!(error = %err, document_id = %document_id, "Source document fetch failed.");

				err
			})?;
		let Some(source) = source else {
			tracing::debug!(document_id = %document_id, "Unknown document; no relations to discover.");

			return Ok(Vec::new());
		};
		let candidate_k = self.cfg.related.candidate_k.max(limit);
		let rows = self
			.sources
			.documents
			.fetch_related_document_candidates(document_id, candidate_k)
			.await
			.map_err(|err| {
				tracing::warn!(error = %err, document_id = %document_id, "Related candidate fetch failed.");

				err
			})?;
		let profile =
			SourceProfile::new(document_id, &source, &self.cfg.related, &self.sanitizer);
		let row_count = rows.len();
		let out = rank_related(&profile, rows, limit as usize, &self.cfg.related, &self.sanitizer);

		tracing::debug!(
			document_id = %document_id,
			row_count,
			returned = out.len(),
			highly_relevant = out.iter().filter(|doc| doc.highly_relevant).count(),
			"Related documents ranked."
		);

		Ok(out)
	}
}

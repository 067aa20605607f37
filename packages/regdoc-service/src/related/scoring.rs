use std::collections::HashSet;

use regdoc_config::Related;
use regdoc_domain::{DocumentId, DocumentType, RelatedDocument, normalize_text, tokenize_terms};
use regdoc_sanitize::Sanitizer;

use crate::{DocumentRow, RelatedRow};

/// Scores closer than this to the highly relevant threshold count as equal to it.
const THRESHOLD_TOLERANCE: f32 = 1e-6;

/// What a candidate is compared against.
#[derive(Debug, Clone)]
pub struct SourceProfile {
	/// Id the caller asked about.
	pub requested_id: DocumentId,
	/// Id on the row the store returned, which may be a canonical form of `requested_id`.
	pub id: DocumentId,
	pub terms: HashSet<String>,
	pub category: Option<String>,
	pub document_type: DocumentType,
}
impl SourceProfile {
	pub fn new(
		requested_id: &DocumentId,
		row: &DocumentRow,
		cfg: &Related,
		sanitizer: &Sanitizer,
	) -> Self {
		let title = sanitizer.strip_to_plain_text(&row.title);

		Self {
			requested_id: requested_id.clone(),
			id: row.id.clone(),
			terms: document_terms(&title, &row.official_reference, cfg.max_terms as usize),
			category: normalized_category(row.category.as_deref()),
			document_type: DocumentType::parse(&row.document_type),
		}
	}

	pub fn is_source(&self, id: &DocumentId) -> bool {
		id == &self.id || id == &self.requested_id
	}
}

/// Each signal is in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RelationSignals {
	pub category: f32,
	pub document_type: f32,
	pub lexical: f32,
	pub reference: f32,
}

/// Weighted mean of the signals. Non-decreasing in every signal since weights are non-negative.
pub fn similarity_score(signals: RelationSignals, cfg: &Related) -> f32 {
	let weights = [
		(cfg.category_weight, signals.category),
		(cfg.document_type_weight, signals.document_type),
		(cfg.lexical_weight, signals.lexical),
		(cfg.reference_weight, signals.reference),
	];
	let mut total_weight = 0.0_f32;
	let mut weighted = 0.0_f32;

	for (weight, signal) in weights {
		let weight = if weight.is_finite() { weight.max(0.0) } else { 0.0 };

		total_weight += weight;
		weighted += weight * signal.clamp(0.0, 1.0);
	}

	if total_weight <= f32::EPSILON {
		return 0.0;
	}

	(weighted / total_weight).clamp(0.0, 1.0)
}

/// Strictly above `threshold`, ignoring float rounding in the weighted mean.
pub fn exceeds_threshold(score: f32, threshold: f32) -> bool {
	score - threshold > THRESHOLD_TOLERANCE
}

/// Scores, orders, and truncates candidate rows. Rows for the source document itself and repeated
/// ids are dropped; equal scores keep store order.
pub fn rank_related(
	source: &SourceProfile,
	rows: Vec<RelatedRow>,
	limit: usize,
	cfg: &Related,
	sanitizer: &Sanitizer,
) -> Vec<RelatedDocument> {
	if limit == 0 {
		return Vec::new();
	}

	let mut scored = Vec::with_capacity(rows.len());

	for row in rows {
		if source.is_source(&row.document.id) || row.document.id.is_blank() {
			continue;
		}

		let title = sanitizer.strip_to_plain_text(&row.document.title).trim().to_string();
		let official_reference =
			sanitizer.strip_to_plain_text(&row.document.official_reference).trim().to_string();
		let document_type = DocumentType::parse(&row.document.document_type);
		let signals = RelationSignals {
			category: category_signal(source, row.document.category.as_deref()),
			document_type: if document_type == source.document_type
				&& document_type != DocumentType::Other
			{
				1.0
			} else {
				0.0
			},
			lexical: jaccard(
				&source.terms,
				&document_terms(&title, &official_reference, cfg.max_terms as usize),
			),
			reference: if row.cross_referenced { 1.0 } else { 0.0 },
		};
		let score = similarity_score(signals, cfg);

		scored.push(RelatedDocument {
			id: row.document.id,
			title,
			official_reference,
			document_type,
			similarity_score: score,
			highly_relevant: exceeds_threshold(score, cfg.highly_relevant_threshold),
		});
	}

	// Stable, so equal scores keep store order.
	scored.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));

	let mut seen = HashSet::new();

	scored.retain(|doc| seen.insert(doc.id.clone()));
	scored.truncate(limit);

	scored
}

fn document_terms(title: &str, official_reference: &str, max_terms: usize) -> HashSet<String> {
	let mut terms = tokenize_terms(title, max_terms);

	for term in tokenize_terms(official_reference, max_terms) {
		if terms.len() >= max_terms.saturating_mul(2) {
			break;
		}

		terms.insert(term);
	}

	terms
}

fn normalized_category(raw: Option<&str>) -> Option<String> {
	raw.map(normalize_text).filter(|category| !category.is_empty())
}

fn category_signal(source: &SourceProfile, candidate: Option<&str>) -> f32 {
	match (source.category.as_deref(), normalized_category(candidate)) {
		(Some(lhs), Some(rhs)) if lhs == rhs => 1.0,
		_ => 0.0,
	}
}

fn jaccard(lhs: &HashSet<String>, rhs: &HashSet<String>) -> f32 {
	if lhs.is_empty() || rhs.is_empty() {
		return 0.0;
	}

	let shared = lhs.intersection(rhs).count();
	let union = lhs.len() + rhs.len() - shared;

	shared as f32 / union as f32
}

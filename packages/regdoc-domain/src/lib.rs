pub mod document;
pub mod query;
pub mod suggestion;
pub mod text;

pub use document::{DocumentId, DocumentType, RelatedDocument, split_by_relevance};
pub use query::SearchQuery;
pub use suggestion::{SourceType, SuggestionCandidate, SuggestionTier, classify};
pub use text::{MatchKind, match_kind, normalize_text, tokenize_terms};

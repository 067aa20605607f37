use crate::text;

pub const DEFAULT_MIN_LENGTH: u32 = 2;

/// A query as typed, plus the length gate that decides whether it is worth retrieving.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchQuery {
	pub raw_text: String,
	pub min_length: u32,
}
impl SearchQuery {
	pub fn new(raw_text: impl Into<String>) -> Self {
		Self { raw_text: raw_text.into(), min_length: DEFAULT_MIN_LENGTH }
	}

	pub fn with_min_length(mut self, min_length: u32) -> Self {
		self.min_length = min_length;

		self
	}

	pub fn trimmed(&self) -> &str {
		self.raw_text.trim()
	}

	pub fn char_len(&self) -> usize {
		self.trimmed().chars().count()
	}

	pub fn is_retrievable(&self) -> bool {
		self.char_len() >= self.min_length.max(1) as usize
	}

	/// Identity used for in-flight de-duplication and popularity lookups.
	pub fn key(&self) -> String {
		text::normalize_text(self.trimmed())
	}
}

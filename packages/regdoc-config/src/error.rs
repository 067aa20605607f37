use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Cannot read search config {path:?}.")]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("Search config {path:?} is not valid TOML: {source}")]
	Parse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},
	/// A setting whose value is out of range. `field` is the dotted TOML key.
	#[error("{field} {reason}")]
	Invalid { field: String, reason: String },
}
impl Error {
	pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
		Self::Invalid { field: field.into(), reason: reason.into() }
	}

	/// The offending TOML key, for validation failures.
	pub fn field(&self) -> Option<&str> {
		match self {
			Self::Invalid { field, .. } => Some(field),
			Self::Read { .. } | Self::Parse { .. } => None,
		}
	}
}

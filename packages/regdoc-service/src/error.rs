pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Cloneable so one in-flight retrieval can hand the same outcome to every waiter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	#[error("Retrieval error: {message}")]
	Retrieval { message: String },
	#[error("Retrieval timed out after {timeout_ms} ms.")]
	Timeout { timeout_ms: u64 },
	#[error("Request was superseded.")]
	Cancelled,
}
impl Error {
	/// Transient failures leave the caller free to retry the same key later.
	pub fn is_transient(&self) -> bool {
		matches!(self, Self::Retrieval { .. } | Self::Timeout { .. })
	}
}

impl From<color_eyre::Report> for Error {
	fn from(err: color_eyre::Report) -> Self {
		Self::Retrieval { message: format!("{err:#}") }
	}
}

use thiserror::Error;

use crate::cmd::json::JsonError;

/// CLI result type.
pub type Result<T> = std::result::Result<T, CliError>;

/// Failures surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
	/// Mapping or descriptor failure.
	#[error(transparent)]
	Map(#[from] protomap::proto::MapError),
	/// Input or output stream failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Malformed JSON text.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
	/// JSON that does not describe a generic value.
	#[error(transparent)]
	Bridge(#[from] JsonError),
}

use thiserror::Error;

use crate::types::UserId;

/// Typed error variants for the collaborative filtering engine.
#[derive(Debug, Error)]
pub enum CfError {
	#[error("Malformed record at line {line}: {reason}")]
	MalformedRecord { line: usize, reason: String },

	#[error("Unknown user: {0}")]
	UnknownUser(UserId),

	#[error("Insufficient data: {0}")]
	InsufficientData(String),

	#[error("Invalid argument: {0}")]
	InvalidArgument(String),

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

impl CfError {
	/// Return a machine-readable error code string for this error variant.
	pub fn code(&self) -> &str {
		match self {
			Self::MalformedRecord { .. } => "MALFORMED_RECORD",
			Self::UnknownUser(_) => "UNKNOWN_USER",
			Self::InsufficientData(_) => "INSUFFICIENT_DATA",
			Self::InvalidArgument(_) => "INVALID_ARGUMENT",
			Self::Io(_) => "IO_ERROR",
		}
	}

	pub fn to_json(&self) -> serde_json::Value {
		serde_json::json!({
			"code": self.code(),
			"message": self.to_string(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn malformed_record_message_names_line() {
		let err = CfError::MalformedRecord {
			line: 7,
			reason: "expected 3 fields, found 2".into(),
		};
		assert_eq!(err.code(), "MALFORMED_RECORD");
		assert_eq!(
			err.to_string(),
			"Malformed record at line 7: expected 3 fields, found 2"
		);
	}

	#[test]
	fn json_carries_code_and_message() {
		let v = CfError::UnknownUser(42).to_json();
		assert_eq!(v["code"], "UNKNOWN_USER");
		assert_eq!(v["message"], "Unknown user: 42");
	}

	#[test]
	fn io_errors_convert() {
		let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
		let err: CfError = io.into();
		assert_eq!(err.code(), "IO_ERROR");
	}
}

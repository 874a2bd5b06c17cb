//! Error types for the automation runtime.

use mobi_protocol::ErrorCode;
use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the automation server.
#[derive(Debug, Error)]
pub enum Error {
	/// The server could not be reached at all.
	#[error("Failed to connect to automation server: {0}")]
	ConnectionFailed(String),

	/// HTTP-level failure after the connection was established.
	#[error("Transport error: {0}")]
	TransportError(String),

	/// The server refused to create a session (app install or launch failure).
	#[error("Session not created: {0}")]
	SessionNotCreated(String),

	/// Error response returned by the automation server.
	#[error("{code}: {message}")]
	Remote {
		/// W3C error code (e.g. `no such element`, `invalid session id`)
		code: ErrorCode,
		/// Human-readable error message
		message: String,
		/// Server-side stack trace (if provided)
		stacktrace: Option<String>,
	},

	/// A single element lookup matched nothing.
	#[error("Element not found: {0}")]
	ElementNotFound(String),

	/// A polling wait ran out of time.
	#[error("Timeout after {ms}ms waiting for: {condition}")]
	Timeout { ms: u64, condition: String },

	/// The response did not have the expected shape.
	#[error("Protocol error: {0}")]
	ProtocolError(String),

	/// Invalid argument provided to method.
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),

	/// I/O error.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

impl Error {
	/// Returns the W3C error code if this is a Remote error.
	pub fn code(&self) -> Option<&ErrorCode> {
		match self {
			Error::Remote { code, .. } => Some(code),
			_ => None,
		}
	}

	/// Returns the stack trace if this is a Remote error with a stack.
	pub fn stack_trace(&self) -> Option<&str> {
		match self {
			Error::Remote { stacktrace, .. } => stacktrace.as_deref(),
			_ => None,
		}
	}

	/// Returns true if the element simply is not there (yet).
	///
	/// This is the only condition a polling wait keeps retrying on.
	pub fn is_no_such_element(&self) -> bool {
		match self {
			Error::ElementNotFound(_) => true,
			Error::Remote { code, .. } => *code == ErrorCode::NoSuchElement,
			_ => false,
		}
	}

	/// Returns true if this is a timeout error.
	pub fn is_timeout(&self) -> bool {
		match self {
			Error::Timeout { .. } => true,
			Error::Remote { code, .. } => *code == ErrorCode::Timeout,
			_ => false,
		}
	}

	/// Returns true if the session is gone or the server is unreachable.
	pub fn is_session_lost(&self) -> bool {
		match self {
			Error::ConnectionFailed(_) => true,
			Error::Remote { code, .. } => *code == ErrorCode::InvalidSessionId,
			_ => false,
		}
	}
}

use thiserror::Error;

use crate::output::{CommandError, ErrorCode, FailureWithArtifacts};

pub type Result<T> = std::result::Result<T, MobiError>;

#[derive(Debug, Error)]
pub enum MobiError {
	/// Run failed and diagnostic artifacts were collected before teardown.
	#[error("{}", failure.error.message)]
	FailureWithArtifacts {
		command: &'static str,
		failure: FailureWithArtifacts,
	},

	#[error("configuration error: {0}")]
	Config(String),

	/// Server unreachable, or the app failed to install/launch.
	#[error("could not start session on {server}: {source}")]
	SessionSetup {
		server: String,
		#[source]
		source: mobi::Error,
	},

	/// A scenario step failed with a client or server error.
	#[error("step '{step}' failed: {source}")]
	Step {
		step: &'static str,
		locator: Option<String>,
		#[source]
		source: mobi::Error,
	},

	#[error("step '{step}': expected {expected:?} from {locator}, got {actual:?}")]
	Assertion {
		step: &'static str,
		locator: String,
		expected: String,
		actual: String,
	},

	#[error("session teardown failed: {0}")]
	Teardown(#[source] mobi::Error),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),

	#[error(transparent)]
	Mobi(#[from] mobi::Error),

	#[error(transparent)]
	Anyhow(#[from] anyhow::Error),
}

/// Picks the output code for a client error.
fn classify(err: &mobi::Error) -> ErrorCode {
	if err.is_timeout() {
		ErrorCode::Timeout
	} else if err.is_no_such_element() {
		ErrorCode::SelectorNotFound
	} else if err.is_session_lost() || matches!(err, mobi::Error::SessionNotCreated(_)) {
		ErrorCode::SessionError
	} else {
		ErrorCode::InternalError
	}
}

impl MobiError {
	/// Convert this error to a CommandError for structured output
	pub fn to_command_error(&self) -> CommandError {
		let (code, message, details) = match self {
			MobiError::FailureWithArtifacts { failure, .. } => {
				return failure.error.clone();
			}
			MobiError::Config(msg) => (ErrorCode::InvalidInput, msg.clone(), None),
			MobiError::SessionSetup { server, source } => (
				ErrorCode::SessionError,
				format!("Could not start session on {server}: {source}"),
				Some(serde_json::json!({ "server": server })),
			),
			MobiError::Step { step, locator, source } => {
				let message = match locator {
					Some(locator) => format!("Step '{step}' failed on {locator}: {source}"),
					None => format!("Step '{step}' failed: {source}"),
				};
				(
					classify(source),
					message,
					Some(serde_json::json!({ "step": step, "locator": locator })),
				)
			}
			MobiError::Assertion {
				step,
				locator,
				expected,
				actual,
			} => (
				ErrorCode::AssertionFailed,
				format!("Step '{step}': expected {expected:?} from {locator}, got {actual:?}"),
				Some(serde_json::json!({
					"step": step,
					"locator": locator,
					"expected": expected,
					"actual": actual,
				})),
			),
			MobiError::Teardown(source) => (ErrorCode::TeardownFailed, format!("Session teardown failed: {source}"), None),
			MobiError::Io(err) => (ErrorCode::IoError, err.to_string(), None),
			MobiError::Json(err) => (ErrorCode::InternalError, format!("JSON error: {err}"), None),
			MobiError::Mobi(err) => (classify(err), err.to_string(), None),
			MobiError::Anyhow(err) => (ErrorCode::InternalError, format!("{err:#}"), None),
		};

		CommandError { code, message, details }
	}
}

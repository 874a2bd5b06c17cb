//! Request and response envelopes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key under which W3C servers return element references.
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52f-4ce4ed8ec6dd";

/// Key used by pre-W3C (JSONWP) servers.
pub const LEGACY_ELEMENT_KEY: &str = "ELEMENT";

/// Payload of a successful `POST /session`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSessionResponse {
	pub session_id: String,
	/// Capabilities as matched by the server.
	#[serde(default)]
	pub capabilities: Value,
}

/// Opaque element reference returned by find-element calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementRef {
	#[serde(rename = "element-6066-11e4-a52f-4ce4ed8ec6dd", default, skip_serializing_if = "Option::is_none")]
	w3c: Option<String>,
	#[serde(rename = "ELEMENT", default, skip_serializing_if = "Option::is_none")]
	legacy: Option<String>,
}

impl ElementRef {
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			w3c: Some(id.into()),
			legacy: None,
		}
	}

	/// Returns the element id, preferring the W3C key.
	pub fn id(&self) -> Option<&str> {
		self.w3c.as_deref().or(self.legacy.as_deref())
	}
}

/// Body of `POST /session/{id}/element/{eid}/value`.
///
/// W3C servers read `text`; older Appium drivers still read `value` as a
/// list of characters, so both are sent.
#[derive(Debug, Clone, Serialize)]
pub struct SendKeysRequest {
	pub text: String,
	pub value: Vec<String>,
}

impl SendKeysRequest {
	pub fn new(text: &str) -> Self {
		Self {
			text: text.to_string(),
			value: text.chars().map(String::from).collect(),
		}
	}
}

/// Payload of a WebDriver error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorValue {
	pub error: ErrorCode,
	#[serde(default)]
	pub message: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub stacktrace: Option<String>,
}

/// W3C error codes the client distinguishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ErrorCode {
	NoSuchElement,
	StaleElementReference,
	ElementNotInteractable,
	InvalidSessionId,
	SessionNotCreated,
	InvalidArgument,
	Timeout,
	UnknownCommand,
	UnknownError,
	/// Any code this client does not model explicitly.
	Other(String),
}

impl ErrorCode {
	pub fn as_str(&self) -> &str {
		match self {
			Self::NoSuchElement => "no such element",
			Self::StaleElementReference => "stale element reference",
			Self::ElementNotInteractable => "element not interactable",
			Self::InvalidSessionId => "invalid session id",
			Self::SessionNotCreated => "session not created",
			Self::InvalidArgument => "invalid argument",
			Self::Timeout => "timeout",
			Self::UnknownCommand => "unknown command",
			Self::UnknownError => "unknown error",
			Self::Other(code) => code,
		}
	}
}

impl From<String> for ErrorCode {
	fn from(code: String) -> Self {
		match code.as_str() {
			"no such element" => Self::NoSuchElement,
			"stale element reference" => Self::StaleElementReference,
			"element not interactable" => Self::ElementNotInteractable,
			"invalid session id" => Self::InvalidSessionId,
			"session not created" => Self::SessionNotCreated,
			"invalid argument" => Self::InvalidArgument,
			"timeout" => Self::Timeout,
			"unknown command" => Self::UnknownCommand,
			"unknown error" => Self::UnknownError,
			_ => Self::Other(code),
		}
	}
}

impl From<ErrorCode> for String {
	fn from(code: ErrorCode) -> Self {
		code.as_str().to_string()
	}
}

impl std::fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

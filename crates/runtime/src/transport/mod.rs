//! HTTP transport to the automation server.
//!
//! WebDriver is plain request/response JSON over HTTP: every call is one
//! round trip, answered with `{"value": ...}` on success or
//! `{"value": {"error": ..., "message": ...}}` with a 4xx/5xx status on
//! failure. [`HttpTransport`] performs the round trip and turns error bodies
//! into [`Error::Remote`].


use std::time::Duration;

use mobi_protocol::{ErrorCode, ErrorValue};
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::{Error, Result};

/// Default per-request timeout. Session creation installs and launches the
/// app, which routinely takes longer than a minute on a cold simulator.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// HTTP method of a WebDriver command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
	Get,
	Post,
	Delete,
}

impl std::fmt::Display for Method {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Method::Get => write!(f, "GET"),
			Method::Post => write!(f, "POST"),
			Method::Delete => write!(f, "DELETE"),
		}
	}
}

/// Stateless HTTP client bound to one server base URL.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
	client: reqwest::Client,
	base: Url,
}

impl HttpTransport {
	/// Creates a transport for `base_url` with [`DEFAULT_REQUEST_TIMEOUT`].
	pub fn new(base_url: &str) -> Result<Self> {
		Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
	}

	/// Creates a transport with an explicit per-request timeout.
	pub fn with_timeout(base_url: &str, request_timeout: Duration) -> Result<Self> {
		let base = normalize_base(base_url)?;
		let client = reqwest::Client::builder()
			.timeout(request_timeout)
			.build()
			.map_err(|e| Error::TransportError(e.to_string()))?;

		Ok(Self { client, base })
	}

	/// Returns the normalized base URL (always ends with `/`).
	pub fn base_url(&self) -> &Url {
		&self.base
	}

	/// Resolves a command path against the base URL.
	pub fn endpoint(&self, path: &str) -> Result<Url> {
		self.base
			.join(path.trim_start_matches('/'))
			.map_err(|e| Error::InvalidArgument(format!("invalid command path '{path}': {e}")))
	}

	/// Executes one command and returns the unwrapped `value` payload.
	///
	/// POST requests without a body send `{}`, which W3C servers require.
	pub async fn execute(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
		let url = self.endpoint(path)?;
		debug!(target = "mobi::transport", %method, path, "request");

		let request = match method {
			Method::Get => self.client.get(url.clone()),
			Method::Delete => self.client.delete(url.clone()),
			Method::Post => self
				.client
				.post(url.clone())
				.json(&body.unwrap_or_else(|| Value::Object(Default::default()))),
		};

		let response = request.send().await.map_err(|e| {
			if e.is_connect() {
				Error::ConnectionFailed(format!("{url}: {e}"))
			} else {
				Error::TransportError(format!("{method} {url}: {e}"))
			}
		})?;

		let status = response.status();
		let text = response
			.text()
			.await
			.map_err(|e| Error::TransportError(format!("reading response from {url}: {e}")))?;
		trace!(target = "mobi::transport", %method, path, status = status.as_u16(), body = %text, "response");

		parse_response(status.as_u16(), &text)
	}
}

fn normalize_base(base_url: &str) -> Result<Url> {
	let mut base = Url::parse(base_url).map_err(|e| Error::InvalidArgument(format!("invalid server url '{base_url}': {e}")))?;
	if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
		return Err(Error::InvalidArgument(format!("server url must be http(s): {base_url}")));
	}
	if !base.path().ends_with('/') {
		let path = format!("{}/", base.path());
		base.set_path(&path);
	}
	Ok(base)
}

/// Maps a raw HTTP status and body onto the `value` payload or an [`Error`].
pub(crate) fn parse_response(status: u16, text: &str) -> Result<Value> {
	let success = (200..300).contains(&status);

	let mut json: Value = match serde_json::from_str(text) {
		Ok(json) => json,
		Err(_) if success => {
			return Err(Error::ProtocolError(format!("non-JSON response (HTTP {status}): {text}")));
		}
		Err(_) => {
			return Err(Error::Remote {
				code: ErrorCode::UnknownError,
				message: format!("HTTP {status}: {text}"),
				stacktrace: None,
			});
		}
	};

	let value = json.get_mut("value").map(Value::take).unwrap_or(Value::Null);

	let carries_error = value.get("error").and_then(Value::as_str).is_some();
	if success && !carries_error {
		return Ok(value);
	}

	match serde_json::from_value::<ErrorValue>(value) {
		Ok(err) => Err(Error::Remote {
			code: err.error,
			message: err.message,
			stacktrace: err.stacktrace,
		}),
		Err(_) => Err(Error::Remote {
			code: ErrorCode::UnknownError,
			message: format!("HTTP {status}: {text}"),
			stacktrace: None,
		}),
	}
}

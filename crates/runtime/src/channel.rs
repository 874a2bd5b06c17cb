//! Session-scoped command channel.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Result;
use crate::transport::{HttpTransport, Method};

/// Sends commands under `/session/{id}/` on a shared [`HttpTransport`].
///
/// Elements hold a clone of their session's channel, so interacting with an
/// element never needs the `Session` itself.
#[derive(Debug, Clone)]
pub struct Channel {
	transport: HttpTransport,
	session_id: Arc<str>,
}

impl Channel {
	pub fn new(transport: HttpTransport, session_id: impl Into<Arc<str>>) -> Self {
		Self {
			transport,
			session_id: session_id.into(),
		}
	}

	pub fn session_id(&self) -> &str {
		&self.session_id
	}

	pub fn transport(&self) -> &HttpTransport {
		&self.transport
	}

	fn path(&self, command: &str) -> String {
		if command.is_empty() {
			format!("session/{}", self.session_id)
		} else {
			format!("session/{}/{}", self.session_id, command.trim_start_matches('/'))
		}
	}

	/// Sends a command and returns the raw `value` payload.
	pub async fn send_raw(&self, method: Method, command: &str, params: Option<Value>) -> Result<Value> {
		self.transport.execute(method, &self.path(command), params).await
	}

	/// Sends a command and deserializes its `value` payload.
	pub async fn send<T: DeserializeOwned>(&self, method: Method, command: &str, params: Option<Value>) -> Result<T> {
		let value = self.send_raw(method, command, params).await?;
		Ok(serde_json::from_value(value)?)
	}

	/// Sends a command whose payload is ignored (usually `null`).
	pub async fn send_no_result(&self, method: Method, command: &str, params: Option<Value>) -> Result<()> {
		self.send_raw(method, command, params).await.map(|_| ())
	}
}

//! [`Session`]: one live automation session on one device.

mod screenshot;

use std::time::Duration;

use mobi_protocol::{Capabilities, ElementRef, ErrorCode, Locator, NewSessionResponse};
use mobi_runtime::{Channel, Error, HttpTransport, Method, Result};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::element::Element;
use crate::wait::{SessionWait, Wait};

/// A live connection to one application instance on one device or simulator.
///
/// Created with [`Session::create`] and released with [`Session::close`],
/// which consumes the handle so the remote session is deleted at most once.
/// A session dropped without `close` logs a warning and, when a tokio
/// runtime is still available, issues a best-effort delete in the
/// background so it does not linger on the server.
#[derive(Debug)]
pub struct Session {
	channel: Channel,
	capabilities: Value,
	closed: bool,
}

impl Session {
	/// Creates a session on the server at `server_url` for `capabilities`.
	///
	/// This installs and launches the app; failures here are fatal for the
	/// test and are never retried.
	pub async fn create(server_url: &str, capabilities: &Capabilities) -> Result<Self> {
		let transport = HttpTransport::new(server_url)?;
		Self::create_with(transport, capabilities).await
	}

	/// Creates a session over an existing transport (custom timeouts).
	pub async fn create_with(transport: HttpTransport, capabilities: &Capabilities) -> Result<Self> {
		info!(
			target = "mobi::session",
			server = %transport.base_url(),
			platform = %capabilities.platform_name,
			version = %capabilities.platform_version,
			device = %capabilities.device_name,
			engine = %capabilities.automation_name,
			"creating session"
		);

		let body = serde_json::to_value(capabilities.to_new_session())?;
		let value = transport
			.execute(Method::Post, "session", Some(body))
			.await
			.map_err(|e| match e {
				Error::Remote {
					code: ErrorCode::SessionNotCreated,
					message,
					..
				} => Error::SessionNotCreated(message),
				other => other,
			})?;

		let response: NewSessionResponse = serde_json::from_value(value)
			.map_err(|e| Error::ProtocolError(format!("unexpected new-session response: {e}")))?;

		info!(target = "mobi::session", session = %response.session_id, "session created");

		Ok(Self {
			channel: Channel::new(transport, response.session_id),
			capabilities: response.capabilities,
			closed: false,
		})
	}

	/// Returns the server-assigned session id.
	pub fn id(&self) -> &str {
		self.channel.session_id()
	}

	/// Returns the capabilities as matched by the server.
	pub fn capabilities(&self) -> &Value {
		&self.capabilities
	}

	pub(crate) fn channel(&self) -> &Channel {
		&self.channel
	}

	/// Finds exactly one element, failing with [`Error::ElementNotFound`] if absent.
	pub async fn find_element(&self, locator: &Locator) -> Result<Element> {
		self.try_find_element(locator)
			.await?
			.ok_or_else(|| Error::ElementNotFound(locator.to_string()))
	}

	/// Finds one element, returning `None` when the server reports `no such element`.
	///
	/// Any other error (unreachable server, dead session) is propagated.
	pub async fn try_find_element(&self, locator: &Locator) -> Result<Option<Element>> {
		let params = serde_json::to_value(locator)?;
		match self.channel.send::<ElementRef>(Method::Post, "element", Some(params)).await {
			Ok(element) => Element::from_ref(self.channel.clone(), element, locator.clone()).map(Some),
			Err(e) if e.is_no_such_element() => {
				debug!(target = "mobi::session", %locator, "element not present");
				Ok(None)
			}
			Err(e) => Err(e),
		}
	}

	/// Finds all matching elements (possibly none).
	pub async fn find_elements(&self, locator: &Locator) -> Result<Vec<Element>> {
		let params = serde_json::to_value(locator)?;
		let refs: Vec<ElementRef> = self.channel.send(Method::Post, "elements", Some(params)).await?;
		refs.into_iter()
			.map(|element| Element::from_ref(self.channel.clone(), element, locator.clone()))
			.collect()
	}

	/// Navigates back one screen.
	pub async fn back(&self) -> Result<()> {
		debug!(target = "mobi::session", session = %self.id(), "back");
		self.channel.send_no_result(Method::Post, "back", None).await
	}

	/// Starts a polling wait bound to this session.
	pub fn wait(&self, timeout: Duration) -> SessionWait<'_> {
		SessionWait::new(self, Wait::new(timeout))
	}

	/// Starts a polling wait with an explicit configuration.
	pub fn wait_with(&self, wait: Wait) -> SessionWait<'_> {
		SessionWait::new(self, wait)
	}

	/// Deletes the remote session.
	///
	/// The handle is consumed even if the delete fails; the caller decides
	/// whether a teardown error matters.
	pub async fn close(mut self) -> Result<()> {
		self.closed = true;
		info!(target = "mobi::session", session = %self.id(), "closing session");
		self.channel.send_no_result(Method::Delete, "", None).await
	}
}

impl Drop for Session {
	fn drop(&mut self) {
		if self.closed {
			return;
		}

		warn!(
			target = "mobi::session",
			session = %self.id(),
			"session dropped without close; deleting in background"
		);

		if let Ok(handle) = tokio::runtime::Handle::try_current() {
			let channel = self.channel.clone();
			handle.spawn(async move {
				if let Err(e) = channel.send_no_result(Method::Delete, "", None).await {
					warn!(target = "mobi::session", session = %channel.session_id(), error = %e, "background session delete failed");
				}
			});
		}
	}
}

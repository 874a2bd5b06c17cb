//! [`Element`]: a server-side element reference plus the locator that found it.

use std::sync::Arc;

use mobi_protocol::{ElementRef, Locator, SendKeysRequest};
use mobi_runtime::{Channel, Error, Method, Result};
use tracing::debug;

/// A located UI element.
///
/// Interactions are stateless remote calls keyed by the element id; the
/// locator is kept only for logging and error messages.
#[derive(Debug, Clone)]
pub struct Element {
	channel: Channel,
	id: Arc<str>,
	locator: Locator,
}

impl Element {
	pub(crate) fn from_ref(channel: Channel, element: ElementRef, locator: Locator) -> Result<Self> {
		let id = element
			.id()
			.ok_or_else(|| Error::ProtocolError(format!("element reference without id for {locator}")))?;

		Ok(Self {
			channel,
			id: Arc::from(id),
			locator,
		})
	}

	/// Returns the server-assigned element id.
	pub fn id(&self) -> &str {
		&self.id
	}

	/// Returns the locator this element was found with.
	pub fn locator(&self) -> &Locator {
		&self.locator
	}

	fn command(&self, action: &str) -> String {
		format!("element/{}/{action}", self.id)
	}

	pub async fn click(&self) -> Result<()> {
		debug!(target = "mobi", element = %self.locator, "click");
		self.channel.send_no_result(Method::Post, &self.command("click"), None).await
	}

	/// Types `text` into the element.
	pub async fn send_keys(&self, text: &str) -> Result<()> {
		debug!(target = "mobi", element = %self.locator, len = text.chars().count(), "send keys");
		let params = serde_json::to_value(SendKeysRequest::new(text))?;
		self.channel.send_no_result(Method::Post, &self.command("value"), Some(params)).await
	}

	pub async fn clear(&self) -> Result<()> {
		debug!(target = "mobi", element = %self.locator, "clear");
		self.channel.send_no_result(Method::Post, &self.command("clear"), None).await
	}

	/// Returns the element's visible text (empty when the server reports `null`).
	pub async fn text(&self) -> Result<String> {
		let text: Option<String> = self.channel.send(Method::Get, &self.command("text"), None).await?;
		Ok(text.unwrap_or_default())
	}

	pub async fn is_displayed(&self) -> Result<bool> {
		self.channel.send(Method::Get, &self.command("displayed"), None).await
	}
}

//! Diagnostic captures for [`Session`]: screenshots and the UI hierarchy.

use base64::Engine;
use mobi_runtime::{Error, Method, Result};

use super::Session;

impl Session {
	/// Captures a screenshot and returns PNG bytes.
	pub async fn screenshot(&self) -> Result<Vec<u8>> {
		let encoded: String = self.channel().send(Method::Get, "screenshot", None).await?;
		decode_png(&encoded)
	}

	/// Captures a screenshot, writes to `path`, and returns the bytes.
	pub async fn screenshot_to_file(&self, path: &std::path::Path) -> Result<Vec<u8>> {
		let bytes = self.screenshot().await?;
		tokio::fs::write(path, &bytes).await?;
		Ok(bytes)
	}

	/// Returns the current UI hierarchy as the server renders it (XML for Appium).
	pub async fn page_source(&self) -> Result<String> {
		self.channel().send(Method::Get, "source", None).await
	}
}

/// Some drivers wrap base64 output at 76 columns.
fn decode_png(encoded: &str) -> Result<Vec<u8>> {
	let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
	base64::prelude::BASE64_STANDARD
		.decode(compact)
		.map_err(|e| Error::ProtocolError(format!("decode screenshot: {e}")))
}

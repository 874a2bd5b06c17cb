//! Element locator strategies.

use serde::{Deserialize, Serialize};

/// Lookup strategy understood by the automation server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
	/// Stable accessibility label, independent of visible text or layout.
	#[serde(rename = "accessibility id")]
	AccessibilityId,
	#[serde(rename = "id")]
	Id,
	#[serde(rename = "xpath")]
	XPath,
	#[serde(rename = "class name")]
	ClassName,
}

impl Strategy {
	/// Returns the wire name of this strategy.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::AccessibilityId => "accessibility id",
			Self::Id => "id",
			Self::XPath => "xpath",
			Self::ClassName => "class name",
		}
	}
}

/// A strategy plus a value, serialized as the body of a find-element call.
///
/// ```json
/// { "using": "accessibility id", "value": "Echo Box" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
	pub using: Strategy,
	pub value: String,
}

impl Locator {
	pub fn new(using: Strategy, value: impl Into<String>) -> Self {
		Self {
			using,
			value: value.into(),
		}
	}

	/// Locates by accessibility identifier.
	pub fn accessibility_id(value: impl Into<String>) -> Self {
		Self::new(Strategy::AccessibilityId, value)
	}

	pub fn id(value: impl Into<String>) -> Self {
		Self::new(Strategy::Id, value)
	}

	pub fn xpath(value: impl Into<String>) -> Self {
		Self::new(Strategy::XPath, value)
	}

	pub fn class_name(value: impl Into<String>) -> Self {
		Self::new(Strategy::ClassName, value)
	}
}

impl std::fmt::Display for Locator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}={:?}", self.using.as_str(), self.value)
	}
}

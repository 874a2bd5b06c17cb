//! Capability descriptor sent when creating a session.
//!
//! W3C only standardizes a handful of capability names; everything
//! else must carry a vendor prefix. Appium uses `appium:`, so the typed
//! [`Capabilities`] struct serializes as:
//!
//! ```json
//! {
//!   "platformName": "iOS",
//!   "appium:platformVersion": "16.2",
//!   "appium:deviceName": "iPhone 14 Pro",
//!   "appium:automationName": "XCUITest",
//!   "appium:app": "/abs/path/TheApp.app.zip"
//! }
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Target mobile platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlatformName {
	#[default]
	#[serde(rename = "iOS")]
	Ios,
	#[serde(rename = "Android")]
	Android,
}

impl std::fmt::Display for PlatformName {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Ios => write!(f, "iOS"),
			Self::Android => write!(f, "Android"),
		}
	}
}

impl std::str::FromStr for PlatformName {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"ios" => Ok(Self::Ios),
			"android" => Ok(Self::Android),
			_ => Err(format!("unknown platform: {s}")),
		}
	}
}

impl PlatformName {
	/// Engine used when a descriptor names only the platform.
	pub fn default_automation(self) -> AutomationName {
		match self {
			Self::Ios => AutomationName::XcuiTest,
			Self::Android => AutomationName::UiAutomator2,
		}
	}
}

/// Automation engine the server should drive the device with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AutomationName {
	#[default]
	#[serde(rename = "XCUITest")]
	XcuiTest,
	#[serde(rename = "UiAutomator2")]
	UiAutomator2,
	#[serde(rename = "Espresso")]
	Espresso,
}

impl std::fmt::Display for AutomationName {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::XcuiTest => write!(f, "XCUITest"),
			Self::UiAutomator2 => write!(f, "UiAutomator2"),
			Self::Espresso => write!(f, "Espresso"),
		}
	}
}

impl std::str::FromStr for AutomationName {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"xcuitest" => Ok(Self::XcuiTest),
			"uiautomator2" => Ok(Self::UiAutomator2),
			"espresso" => Ok(Self::Espresso),
			_ => Err(format!("unknown automation engine: {s}")),
		}
	}
}

impl AutomationName {
	/// Platform this engine drives.
	pub fn platform(self) -> PlatformName {
		match self {
			Self::XcuiTest => PlatformName::Ios,
			Self::UiAutomator2 | Self::Espresso => PlatformName::Android,
		}
	}
}

/// Typed capability descriptor for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
	/// Target platform (`platformName`).
	#[serde(rename = "platformName")]
	pub platform_name: PlatformName,
	/// OS version on the device or simulator (`appium:platformVersion`).
	#[serde(rename = "appium:platformVersion")]
	pub platform_version: String,
	/// Device model, e.g. `"iPhone 14 Pro"` (`appium:deviceName`).
	#[serde(rename = "appium:deviceName")]
	pub device_name: String,
	/// Automation engine (`appium:automationName`).
	#[serde(rename = "appium:automationName")]
	pub automation_name: AutomationName,
	/// Packaged application bundle to install and launch (`appium:app`).
	#[serde(rename = "appium:app")]
	pub app: PathBuf,
}

impl Capabilities {
	/// Creates an iOS/XCUITest descriptor for the given device and app bundle.
	pub fn ios(platform_version: impl Into<String>, device_name: impl Into<String>, app: impl Into<PathBuf>) -> Self {
		Self {
			platform_name: PlatformName::Ios,
			platform_version: platform_version.into(),
			device_name: device_name.into(),
			automation_name: AutomationName::XcuiTest,
			app: app.into(),
		}
	}

	/// Creates an Android/UiAutomator2 descriptor for the given device and app package.
	pub fn android(platform_version: impl Into<String>, device_name: impl Into<String>, app: impl Into<PathBuf>) -> Self {
		Self {
			platform_name: PlatformName::Android,
			platform_version: platform_version.into(),
			device_name: device_name.into(),
			automation_name: AutomationName::UiAutomator2,
			app: app.into(),
		}
	}

	/// Wraps these capabilities in the W3C new-session payload.
	pub fn to_new_session(&self) -> NewSessionRequest {
		NewSessionRequest {
			capabilities: CapabilitiesRequest {
				always_match: self.clone(),
				first_match: vec![serde_json::Map::new()],
			},
		}
	}
}

/// Body of `POST /session`.
#[derive(Debug, Clone, Serialize)]
pub struct NewSessionRequest {
	pub capabilities: CapabilitiesRequest,
}

/// W3C capability negotiation block.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilitiesRequest {
	pub always_match: Capabilities,
	pub first_match: Vec<serde_json::Map<String, serde_json::Value>>,
}

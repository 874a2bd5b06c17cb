//! Run configuration: server endpoint, capabilities, and wait timing.
//!
//! Layers, later wins:
//!
//! 1. built-in defaults (local Appium, iPhone 14 Pro simulator on iOS 16.2)
//! 2. JSON config file (`--config`)
//! 3. `MOBI_*` environment variables
//! 4. command-line flags

use std::path::{Path, PathBuf};
use std::time::Duration;

use mobi::{AutomationName, Capabilities, PlatformName};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{MobiError, Result};
use crate::output::EffectiveConfig;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:4723";
pub const DEFAULT_PLATFORM_VERSION: &str = "16.2";
pub const DEFAULT_DEVICE_NAME: &str = "iPhone 14 Pro";
/// App bundle location relative to the workspace root.
pub const DEFAULT_APP: &str = "mobile/TheApp.app.zip";
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Environment variables consulted by [`ConfigOverrides::from_env`].
pub const ENV_SERVER_URL: &str = "MOBI_SERVER_URL";
pub const ENV_APP: &str = "MOBI_APP";
pub const ENV_PLATFORM_NAME: &str = "MOBI_PLATFORM_NAME";
pub const ENV_AUTOMATION_NAME: &str = "MOBI_AUTOMATION_NAME";
pub const ENV_PLATFORM_VERSION: &str = "MOBI_PLATFORM_VERSION";
pub const ENV_DEVICE_NAME: &str = "MOBI_DEVICE_NAME";
pub const ENV_WAIT_TIMEOUT_MS: &str = "MOBI_WAIT_TIMEOUT_MS";

/// Fully resolved configuration for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
	pub server_url: Url,
	pub capabilities: Capabilities,
	/// Upper bound for each polling wait.
	pub wait_timeout: Duration,
	pub poll_interval: Duration,
	/// Where screenshots and page source are saved when a run fails.
	pub artifacts_dir: Option<PathBuf>,
}

impl Default for RunConfig {
	fn default() -> Self {
		Self {
			server_url: Url::parse(DEFAULT_SERVER_URL).expect("default server url is valid"),
			capabilities: Capabilities::ios(DEFAULT_PLATFORM_VERSION, DEFAULT_DEVICE_NAME, workspace_root().join(DEFAULT_APP)),
			wait_timeout: DEFAULT_WAIT_TIMEOUT,
			poll_interval: mobi::DEFAULT_POLL_INTERVAL,
			artifacts_dir: None,
		}
	}
}

impl RunConfig {
	/// Applies a layer of overrides on top of this config.
	///
	/// A layer naming only the platform switches to that platform's default
	/// engine unless the current one already drives it. A layer naming only
	/// the engine switches to the engine's platform.
	pub fn apply(mut self, overrides: ConfigOverrides) -> Result<Self> {
		if let Some(url) = overrides.server_url {
			self.server_url = Url::parse(&url).map_err(|e| MobiError::Config(format!("invalid server url '{url}': {e}")))?;
		}
		match (overrides.platform_name, overrides.automation_name) {
			(Some(platform), Some(engine)) if engine.platform() != platform => {
				return Err(MobiError::Config(format!("automation engine {engine} cannot drive {platform}")));
			}
			(_, Some(engine)) => {
				self.capabilities.platform_name = engine.platform();
				self.capabilities.automation_name = engine;
			}
			(Some(platform), None) => {
				self.capabilities.platform_name = platform;
				if self.capabilities.automation_name.platform() != platform {
					self.capabilities.automation_name = platform.default_automation();
				}
			}
			(None, None) => {}
		}
		if let Some(version) = overrides.platform_version {
			self.capabilities.platform_version = version;
		}
		if let Some(device) = overrides.device_name {
			self.capabilities.device_name = device;
		}
		if let Some(app) = overrides.app {
			self.capabilities.app = app;
		}
		if let Some(ms) = overrides.wait_timeout_ms {
			self.wait_timeout = Duration::from_millis(ms);
		}
		if let Some(ms) = overrides.poll_interval_ms {
			if ms == 0 {
				return Err(MobiError::Config("pollIntervalMs must be greater than zero".into()));
			}
			self.poll_interval = Duration::from_millis(ms);
		}
		if let Some(dir) = overrides.artifacts_dir {
			self.artifacts_dir = Some(dir);
		}
		Ok(self)
	}

	/// Returns the wait configuration derived from this run config.
	pub fn wait(&self) -> mobi::Wait {
		mobi::Wait::new(self.wait_timeout).interval(self.poll_interval)
	}

	/// Summary echoed back in the result envelope.
	pub fn effective(&self) -> EffectiveConfig {
		EffectiveConfig {
			server_url: self.server_url.to_string(),
			platform: self.capabilities.platform_name.to_string(),
			automation: self.capabilities.automation_name.to_string(),
			platform_version: self.capabilities.platform_version.clone(),
			device_name: self.capabilities.device_name.clone(),
			app: self.capabilities.app.clone(),
			timeout_ms: self.wait_timeout.as_millis() as u64,
			poll_interval_ms: self.poll_interval.as_millis() as u64,
		}
	}
}

/// One configuration layer. Every field is optional; unknown keys are rejected
/// so a misspelled capability fails loudly instead of being ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigOverrides {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub server_url: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub platform_name: Option<PlatformName>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub platform_version: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub device_name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub automation_name: Option<AutomationName>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub app: Option<PathBuf>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub wait_timeout_ms: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub poll_interval_ms: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub artifacts_dir: Option<PathBuf>,
}

impl ConfigOverrides {
	/// Loads a JSON config file. Relative paths inside it resolve against the
	/// file's own directory.
	pub fn from_file(path: &Path) -> Result<Self> {
		let raw = std::fs::read_to_string(path)
			.map_err(|e| MobiError::Config(format!("reading config file {}: {e}", path.display())))?;
		let overrides: Self = serde_json::from_str(&raw).map_err(|e| MobiError::Config(format!("{}: {e}", path.display())))?;
		let base = path.parent().unwrap_or_else(|| Path::new("."));
		Ok(overrides.resolve_paths(base))
	}

	/// Reads the `MOBI_*` environment variables.
	pub fn from_env() -> Result<Self> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Builds overrides from an arbitrary key lookup (environment in production).
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
		let wait_timeout_ms = match lookup(ENV_WAIT_TIMEOUT_MS) {
			Some(raw) => Some(
				raw.trim()
					.parse::<u64>()
					.map_err(|e| MobiError::Config(format!("{ENV_WAIT_TIMEOUT_MS}='{raw}': {e}")))?,
			),
			None => None,
		};

		Ok(Self {
			server_url: lookup(ENV_SERVER_URL),
			platform_name: parse_env(&lookup, ENV_PLATFORM_NAME)?,
			automation_name: parse_env(&lookup, ENV_AUTOMATION_NAME)?,
			platform_version: lookup(ENV_PLATFORM_VERSION),
			device_name: lookup(ENV_DEVICE_NAME),
			app: lookup(ENV_APP).map(PathBuf::from),
			wait_timeout_ms,
			..Self::default()
		})
	}

	/// Makes relative `app` and `artifactsDir` absolute against `base`.
	pub fn resolve_paths(mut self, base: &Path) -> Self {
		self.app = self.app.map(|p| resolve_relative(base, p));
		self.artifacts_dir = self.artifacts_dir.map(|p| resolve_relative(base, p));
		self
	}
}

/// Builds the effective config from all layers.
pub fn load(config_file: Option<&Path>, cli: ConfigOverrides) -> Result<RunConfig> {
	let mut config = RunConfig::default();
	if let Some(path) = config_file {
		config = config.apply(ConfigOverrides::from_file(path)?)?;
	}
	config.apply(ConfigOverrides::from_env()?)?.apply(cli)
}

fn parse_env<T>(lookup: impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
	T: std::str::FromStr<Err = String>,
{
	lookup(key)
		.map(|raw| raw.trim().parse().map_err(|e| MobiError::Config(format!("{key}='{raw}': {e}"))))
		.transpose()
}

fn resolve_relative(base: &Path, path: PathBuf) -> PathBuf {
	if path.is_absolute() { path } else { base.join(path) }
}

/// Workspace root of this checkout (two levels above this crate).
pub fn workspace_root() -> PathBuf {
	let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest.ancestors().nth(2).unwrap_or(manifest).to_path_buf()
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use super::*;

	#[test]
	fn defaults_match_local_simulator_fixture() {
		let cfg = RunConfig::default();
		assert_eq!(cfg.server_url.as_str(), "http://localhost:4723/");
		assert_eq!(cfg.capabilities.platform_name, PlatformName::Ios);
		assert_eq!(cfg.capabilities.platform_version, "16.2");
		assert_eq!(cfg.capabilities.device_name, "iPhone 14 Pro");
		assert_eq!(cfg.capabilities.automation_name, AutomationName::XcuiTest);
		assert!(cfg.capabilities.app.is_absolute());
		assert!(cfg.capabilities.app.ends_with("mobile/TheApp.app.zip"));
		assert_eq!(cfg.wait_timeout, Duration::from_secs(10));
		assert_eq!(cfg.poll_interval, Duration::from_millis(500));
	}

	#[test]
	fn later_layers_win() {
		let cfg = RunConfig::default()
			.apply(ConfigOverrides {
				device_name: Some("iPhone 15".into()),
				wait_timeout_ms: Some(3000),
				..Default::default()
			})
			.unwrap()
			.apply(ConfigOverrides {
				device_name: Some("iPad Air".into()),
				..Default::default()
			})
			.unwrap();

		assert_eq!(cfg.capabilities.device_name, "iPad Air");
		assert_eq!(cfg.wait_timeout, Duration::from_secs(3));
	}

	#[test]
	fn rejects_bad_server_url_and_zero_interval() {
		let bad_url = RunConfig::default().apply(ConfigOverrides {
			server_url: Some("localhost 4723".into()),
			..Default::default()
		});
		assert!(matches!(bad_url, Err(MobiError::Config(_))));

		let zero = RunConfig::default().apply(ConfigOverrides {
			poll_interval_ms: Some(0),
			..Default::default()
		});
		assert!(matches!(zero, Err(MobiError::Config(_))));
	}

	#[test]
	fn env_lookup_reads_known_keys() {
		let env: HashMap<&str, &str> = HashMap::from([
			(ENV_SERVER_URL, "http://grid:4444/wd/hub"),
			(ENV_APP, "/builds/TheApp.app.zip"),
			(ENV_WAIT_TIMEOUT_MS, "2500"),
		]);
		let overrides = ConfigOverrides::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();

		assert_eq!(overrides.server_url.as_deref(), Some("http://grid:4444/wd/hub"));
		assert_eq!(overrides.app, Some(PathBuf::from("/builds/TheApp.app.zip")));
		assert_eq!(overrides.wait_timeout_ms, Some(2500));
		assert_eq!(overrides.device_name, None);
	}

	#[test]
	fn env_lookup_rejects_non_numeric_timeout() {
		let result = ConfigOverrides::from_lookup(|k| (k == ENV_WAIT_TIMEOUT_MS).then(|| "soon".to_string()));
		assert!(matches!(result, Err(MobiError::Config(_))));
	}

	#[test]
	fn config_file_paths_resolve_against_file_dir() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("mobi.json");
		std::fs::write(
			&path,
			r#"{"platformName": "Android", "automationName": "UiAutomator2", "app": "apps/demo.apk", "artifactsDir": "out"}"#,
		)
		.unwrap();

		let overrides = ConfigOverrides::from_file(&path).unwrap();
		assert_eq!(overrides.platform_name, Some(PlatformName::Android));
		assert_eq!(overrides.automation_name, Some(AutomationName::UiAutomator2));
		assert_eq!(overrides.app, Some(dir.path().join("apps/demo.apk")));
		assert_eq!(overrides.artifacts_dir, Some(dir.path().join("out")));
	}

	#[test]
	fn config_file_rejects_misspelled_keys() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("mobi.json");
		std::fs::write(&path, r#"{"deviceNmae": "iPhone"}"#).unwrap();

		assert!(matches!(ConfigOverrides::from_file(&path), Err(MobiError::Config(_))));
	}

	#[test]
	fn missing_config_file_is_a_config_error() {
		let err = ConfigOverrides::from_file(Path::new("/definitely/not/here.json")).unwrap_err();
		assert!(err.to_string().contains("reading config file"));
		assert!(matches!(err, MobiError::Config(_)));
	}

	#[test]
	fn switching_platform_picks_its_engine() {
		let cfg = RunConfig::default()
			.apply(ConfigOverrides {
				platform_name: Some(PlatformName::Android),
				..Default::default()
			})
			.unwrap();

		assert_eq!(cfg.capabilities.platform_name, PlatformName::Android);
		assert_eq!(cfg.capabilities.automation_name, AutomationName::UiAutomator2);
	}

	#[test]
	fn platform_layer_keeps_an_engine_that_already_fits() {
		let cfg = RunConfig::default()
			.apply(ConfigOverrides {
				automation_name: Some(AutomationName::Espresso),
				..Default::default()
			})
			.unwrap()
			.apply(ConfigOverrides {
				platform_name: Some(PlatformName::Android),
				..Default::default()
			})
			.unwrap();

		assert_eq!(cfg.capabilities.platform_name, PlatformName::Android);
		assert_eq!(cfg.capabilities.automation_name, AutomationName::Espresso);
	}

	#[test]
	fn mismatched_platform_and_engine_are_rejected() {
		let result = RunConfig::default().apply(ConfigOverrides {
			platform_name: Some(PlatformName::Android),
			automation_name: Some(AutomationName::XcuiTest),
			..Default::default()
		});
		assert!(matches!(result, Err(MobiError::Config(_))));
	}

	#[test]
	fn env_lookup_parses_platform_and_engine() {
		let env: HashMap<&str, &str> = HashMap::from([(ENV_PLATFORM_NAME, "android"), (ENV_AUTOMATION_NAME, "Espresso")]);
		let overrides = ConfigOverrides::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();

		assert_eq!(overrides.platform_name, Some(PlatformName::Android));
		assert_eq!(overrides.automation_name, Some(AutomationName::Espresso));

		let bad = ConfigOverrides::from_lookup(|k| (k == ENV_PLATFORM_NAME).then(|| "symbian".to_string()));
		assert!(matches!(bad, Err(MobiError::Config(_))));
	}
}

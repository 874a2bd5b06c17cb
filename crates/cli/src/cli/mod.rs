
use std::path::{Path, PathBuf};

use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{Args, Parser, Subcommand};
use mobi::{AutomationName, PlatformName};

use crate::config::ConfigOverrides;
use crate::output::OutputFormat;
use crate::scenario::DEFAULT_TEXT;

/// Help colours matching cargo: green bold headers, cyan literals.
pub fn cli_styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Green.on_default().bold())
		.usage(AnsiColor::Green.on_default().bold())
		.literal(AnsiColor::Cyan.on_default())
		.placeholder(AnsiColor::Cyan.on_default())
		.valid(AnsiColor::Cyan.on_default())
}

/// End-to-end checks for mobile apps driven through an Appium server.
#[derive(Parser, Debug)]
#[command(name = "mobi")]
#[command(about = "End-to-end Echo Box check for mobile apps over Appium")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format: text (default), json, or ndjson
	#[arg(short = 'f', long, global = true, value_enum, default_value = "text")]
	pub format: OutputFormat,

	/// JSON config file (camelCase keys)
	#[arg(long, global = true, value_name = "FILE")]
	pub config: Option<PathBuf>,

	#[command(flatten)]
	pub target: TargetArgs,

	#[command(subcommand)]
	pub command: Commands,
}

/// Flags overriding the config file and environment.
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
	/// Automation server URL [default: http://localhost:4723]
	#[arg(long, global = true, value_name = "URL")]
	pub server: Option<String>,

	/// Target platform (ios, android)
	#[arg(long, global = true, value_name = "NAME")]
	pub platform: Option<PlatformName>,

	/// Automation engine (xcuitest, uiautomator2, espresso) [default: the platform's own]
	#[arg(long, global = true, value_name = "NAME")]
	pub automation: Option<AutomationName>,

	/// App bundle to install, relative to the current directory
	#[arg(long, global = true, value_name = "PATH")]
	pub app: Option<PathBuf>,

	#[arg(long, global = true, value_name = "VERSION")]
	pub platform_version: Option<String>,

	/// Device or simulator name
	#[arg(long, global = true, value_name = "NAME")]
	pub device: Option<String>,

	/// Upper bound for each element wait
	#[arg(long, global = true, value_name = "MS")]
	pub timeout_ms: Option<u64>,

	/// Directory for failure screenshots and page sources
	#[arg(long, global = true, value_name = "DIR")]
	pub artifacts_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Create a session and close it again.
	Smoke,
	/// Run the Echo Box scenario.
	Echo(EchoArgs),
	/// Print the new-session request without contacting the server.
	Caps,
}

impl Commands {
	pub fn name(&self) -> &'static str {
		match self {
			Commands::Smoke => "smoke",
			Commands::Echo(_) => "echo",
			Commands::Caps => "caps",
		}
	}
}

#[derive(Args, Debug, Clone)]
pub struct EchoArgs {
	/// Message to save and read back
	#[arg(long, default_value = DEFAULT_TEXT)]
	pub text: String,
}

impl Cli {
	/// The command-line layer of the config; relative paths resolve against `cwd`.
	pub fn overrides(&self, cwd: &Path) -> ConfigOverrides {
		let t = &self.target;
		ConfigOverrides {
			server_url: t.server.clone(),
			platform_name: t.platform,
			automation_name: t.automation,
			platform_version: t.platform_version.clone(),
			device_name: t.device.clone(),
			app: t.app.clone(),
			wait_timeout_ms: t.timeout_ms,
			artifacts_dir: t.artifacts_dir.clone(),
			..ConfigOverrides::default()
		}
		.resolve_paths(cwd)
	}
}

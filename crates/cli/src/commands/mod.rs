//! Command implementations. Each command has a `run` returning its data and an
//! `execute` that prints the result envelope.

pub mod caps;
pub mod echo;
pub mod smoke;

use anyhow::Context;

use crate::cli::{Cli, Commands};
use crate::config;
use crate::error::Result;
use crate::output::{CommandInputs, OutputFormat};

pub async fn dispatch(cli: Cli, format: OutputFormat) -> Result<()> {
	let cwd = std::env::current_dir().context("resolving the current directory")?;
	let config = config::load(cli.config.as_deref(), cli.overrides(&cwd))?;
	let inputs = CommandInputs {
		config_file: cli.config.clone(),
		..Default::default()
	};

	match cli.command {
		Commands::Smoke => smoke::execute(&config, inputs, format).await,
		Commands::Echo(args) => echo::execute(&config, &args.text, inputs, format).await,
		Commands::Caps => caps::execute(&config, inputs, format),
	}
}

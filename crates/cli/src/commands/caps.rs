//! `mobi caps`: show the new-session request for the effective config.

use crate::config::RunConfig;
use crate::error::Result;
use crate::output::{CapsData, CommandInputs, OutputFormat, ResultBuilder, print_result};

pub fn run(config: &RunConfig) -> Result<CapsData> {
	Ok(CapsData {
		server_url: config.server_url.to_string(),
		request: serde_json::to_value(config.capabilities.to_new_session())?,
	})
}

pub fn execute(config: &RunConfig, inputs: CommandInputs, format: OutputFormat) -> Result<()> {
	let result = ResultBuilder::new("caps")
		.inputs(inputs)
		.config(config.effective())
		.data(run(config)?)
		.build();
	print_result(&result, format);
	Ok(())
}

//! `mobi echo`: the Echo Box scenario in one scoped session.

use crate::config::RunConfig;
use crate::error::Result;
use crate::output::{CommandInputs, EchoData, OutputFormat, ResultBuilder, print_result};
use crate::scenario::EchoBoxScenario;
use crate::session_helpers::{ArtifactsPolicy, with_session};

pub async fn run(config: &RunConfig, text: &str) -> Result<EchoData> {
	let scenario = EchoBoxScenario::new(text).with_wait(config.wait());

	with_session(config, ArtifactsPolicy::OnError { command: "echo" }, move |session| {
		Box::pin(async move {
			let report = scenario.run(session).await?;
			Ok(EchoData {
				session_id: session.id().to_string(),
				text: report.text,
				steps: report.steps,
			})
		})
	})
	.await
}

pub async fn execute(config: &RunConfig, text: &str, inputs: CommandInputs, format: OutputFormat) -> Result<()> {
	let builder = ResultBuilder::new("echo")
		.inputs(CommandInputs {
			text: Some(text.to_string()),
			..inputs
		})
		.config(config.effective());
	let data = run(config, text).await?;
	print_result(&builder.data(data).build(), format);
	Ok(())
}

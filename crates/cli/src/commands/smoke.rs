//! `mobi smoke`: create a session and close it again.

use tracing::info;

use crate::config::RunConfig;
use crate::error::Result;
use crate::output::{CommandInputs, OutputFormat, ResultBuilder, SmokeData, print_result};
use crate::session_helpers::{ArtifactsPolicy, with_session};

pub async fn run(config: &RunConfig) -> Result<SmokeData> {
	with_session(config, ArtifactsPolicy::Never, |session| {
		Box::pin(async move {
			info!(target = "mobi", session = %session.id(), "session is up");
			Ok(SmokeData {
				session_id: session.id().to_string(),
				capabilities: session.capabilities().clone(),
			})
		})
	})
	.await
}

pub async fn execute(config: &RunConfig, inputs: CommandInputs, format: OutputFormat) -> Result<()> {
	let builder = ResultBuilder::new("smoke").inputs(inputs).config(config.effective());
	let data = run(config).await?;
	print_result(&builder.data(data).build(), format);
	Ok(())
}

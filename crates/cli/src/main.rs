use clap::Parser;
use mobi_cli::cli::Cli;
use mobi_cli::error::MobiError;
use mobi_cli::output::{self, OutputFormat, ResultBuilder};
use mobi_cli::{commands, logging};

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	let format = cli.format;
	let command = cli.command.name();

	if let Err(err) = commands::dispatch(cli, format).await {
		handle_error(command, err, format);
		std::process::exit(1);
	}
}

fn handle_error(command: &str, err: MobiError, format: OutputFormat) {
	let cmd_error = err.to_command_error();

	// Always print to stderr for humans
	output::print_error_stderr(&cmd_error);

	if let MobiError::FailureWithArtifacts { command, failure } = &err {
		output::print_failure_with_artifacts(command, failure, format);
		return;
	}

	// Also emit the envelope to stdout with ok=false for machine consumers
	if format != OutputFormat::Text {
		let result: output::CommandResult<()> = ResultBuilder::new(command).error(cmd_error).build();
		output::print_result(&result, format);
	}
}

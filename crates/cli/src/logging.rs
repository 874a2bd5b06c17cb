use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Maps `-v` occurrences to a default filter; `RUST_LOG` takes precedence.
pub fn default_filter(verbosity: u8) -> &'static str {
	// 0 = errors, plus session warnings (teardown, leaked sessions)
	// 1 (-v) = scenario steps and session lifecycle
	// 2+ (-vv) = every request, wait attempt, and element call
	match verbosity {
		0 => "error,mobi::session=warn",
		1 => "info,mobi::transport=warn",
		_ => "debug",
	}
}

pub fn init_logging(verbosity: u8) {
	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

	let stderr = std::io::stderr.with_max_level(tracing::Level::TRACE);

	tracing_subscriber::fmt()
		.with_env_filter(env_filter)
		.with_writer(stderr)
		.with_target(true)
		.with_level(true)
		.compact()
		.init();
}

//! Session lifecycle helpers for command execution.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use mobi::Session;
use tracing::warn;

use crate::config::RunConfig;
use crate::error::{MobiError, Result};
use crate::output::{Artifact, ArtifactType, FailureWithArtifacts};

/// When to collect failure artifacts (screenshot, page source).
#[derive(Debug, Clone, Copy)]
pub enum ArtifactsPolicy {
	Never,
	/// Collect into the configured artifacts directory, named after `command`.
	OnError { command: &'static str },
}

/// Creates a session, runs `f` with it, and closes it on every exit path.
///
/// A close failure after a successful run is a [`MobiError::Teardown`]. After a
/// failed run the close is best-effort: its error is logged and the original
/// failure is returned, carrying any artifacts collected before teardown.
pub async fn with_session<T>(
	config: &RunConfig,
	artifacts: ArtifactsPolicy,
	f: impl for<'s> FnOnce(&'s Session) -> Pin<Box<dyn Future<Output = Result<T>> + 's>>,
) -> Result<T> {
	let session = Session::create(config.server_url.as_str(), &config.capabilities)
		.await
		.map_err(|source| MobiError::SessionSetup {
			server: config.server_url.to_string(),
			source,
		})?;

	let res = f(&session).await;

	match res {
		Ok(v) => {
			session.close().await.map_err(MobiError::Teardown)?;
			Ok(v)
		}
		Err(e) => {
			let collected = match (artifacts, config.artifacts_dir.as_deref()) {
				(ArtifactsPolicy::OnError { command }, Some(dir)) => {
					collect_failure_artifacts(&session, dir, command).await
				}
				_ => Vec::new(),
			};

			close_best_effort(session).await;

			if let (ArtifactsPolicy::OnError { command }, false) = (artifacts, collected.is_empty()) {
				let failure = FailureWithArtifacts::new(e.to_command_error()).with_artifacts(collected);
				return Err(MobiError::FailureWithArtifacts { command, failure });
			}
			Err(e)
		}
	}
}

async fn close_best_effort(session: Session) {
	let id = session.id().to_string();
	if let Err(err) = session.close().await {
		warn!(target = "mobi::session", session = %id, error = %err, "teardown after failure did not complete");
	}
}

/// Saves a screenshot and the page source into `dir`.
///
/// Each artifact is independent; one that cannot be captured or written is
/// logged and skipped.
pub async fn collect_failure_artifacts(session: &Session, dir: &Path, command: &str) -> Vec<Artifact> {
	let mut artifacts = Vec::new();

	if let Err(err) = tokio::fs::create_dir_all(dir).await {
		warn!(target = "mobi", dir = %dir.display(), error = %err, "cannot create artifacts directory");
		return artifacts;
	}

	match session.screenshot().await {
		Ok(png) => {
			let path = dir.join(format!("{command}-failure.png"));
			match tokio::fs::write(&path, &png).await {
				Ok(()) => artifacts.push(Artifact {
					artifact_type: ArtifactType::Screenshot,
					path,
					size_bytes: Some(png.len() as u64),
				}),
				Err(err) => warn!(target = "mobi", path = %path.display(), error = %err, "failed to write screenshot"),
			}
		}
		Err(err) => warn!(target = "mobi", error = %err, "failed to capture screenshot"),
	}

	match session.page_source().await {
		Ok(source) => {
			let path = dir.join(format!("{command}-failure.xml"));
			match tokio::fs::write(&path, source.as_bytes()).await {
				Ok(()) => artifacts.push(Artifact {
					artifact_type: ArtifactType::PageSource,
					path,
					size_bytes: Some(source.len() as u64),
				}),
				Err(err) => warn!(target = "mobi", path = %path.display(), error = %err, "failed to write page source"),
			}
		}
		Err(err) => warn!(target = "mobi", error = %err, "failed to capture page source"),
	}

	artifacts
}

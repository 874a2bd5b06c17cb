//! The Echo Box scenario against TheApp.
//!
//! Opens the Echo Box screen, saves a message, checks it is echoed back, then
//! leaves and re-enters the screen to check the message persisted.

use std::future::Future;
use std::time::{Duration, Instant};

use mobi::{Locator, Session, Wait};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{MobiError, Result};

/// Accessibility ids exposed by TheApp.
pub const ECHO_BOX: &str = "Echo Box";
pub const MESSAGE_INPUT: &str = "messageInput";
pub const SAVE_BUTTON: &str = "messageSaveBtn";
pub const SAVED_MESSAGE: &str = "savedMessage";

pub const DEFAULT_TEXT: &str = "Hello";

/// One completed scenario step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
	pub name: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub locator: Option<String>,
	pub elapsed_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchoReport {
	pub text: String,
	pub steps: Vec<StepRecord>,
}

/// Enter a message, save it, and read it back before and after navigating away.
#[derive(Debug, Clone)]
pub struct EchoBoxScenario {
	text: String,
	wait: Wait,
}

impl EchoBoxScenario {
	pub fn new(text: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			wait: Wait::new(Duration::from_secs(10)),
		}
	}

	/// Overrides the wait used when looking for screens and inputs.
	pub fn with_wait(mut self, wait: Wait) -> Self {
		self.wait = wait;
		self
	}

	pub fn text(&self) -> &str {
		&self.text
	}

	pub async fn run(&self, session: &Session) -> Result<EchoReport> {
		let echo_box = Locator::accessibility_id(ECHO_BOX);
		let input = Locator::accessibility_id(MESSAGE_INPUT);
		let save = Locator::accessibility_id(SAVE_BUTTON);
		let saved = Locator::accessibility_id(SAVED_MESSAGE);
		let waiter = session.wait_with(self.wait);
		let mut steps = Steps::default();

		steps
			.run("open echo box", Some(&echo_box), async {
				waiter.element(&echo_box).await?.click().await
			})
			.await?;

		steps
			.run("type message", Some(&input), async {
				waiter.element(&input).await?.send_keys(&self.text).await
			})
			.await?;

		steps
			.run("save message", Some(&save), async { session.find_element(&save).await?.click().await })
			.await?;

		let echoed = steps
			.run("read saved message", Some(&saved), async { session.find_element(&saved).await?.text().await })
			.await?;
		expect_text("read saved message", &saved, &self.text, echoed)?;

		steps.run("navigate back", None, session.back()).await?;

		steps
			.run("reopen echo box", Some(&echo_box), async {
				waiter.element(&echo_box).await?.click().await
			})
			.await?;

		let persisted = steps
			.run("read persisted message", Some(&saved), async {
				session.find_element(&saved).await?.text().await
			})
			.await?;
		expect_text("read persisted message", &saved, &self.text, persisted)?;

		Ok(EchoReport {
			text: self.text.clone(),
			steps: steps.into_records(),
		})
	}
}

impl Default for EchoBoxScenario {
	fn default() -> Self {
		Self::new(DEFAULT_TEXT)
	}
}

/// Runs steps in order, timing each and tagging failures with the step name.
#[derive(Debug, Default)]
struct Steps {
	records: Vec<StepRecord>,
}

impl Steps {
	async fn run<T>(
		&mut self,
		name: &'static str,
		locator: Option<&Locator>,
		action: impl Future<Output = mobi::Result<T>>,
	) -> Result<T> {
		let started = Instant::now();
		let locator = locator.map(ToString::to_string);

		let value = action.await.map_err(|source| MobiError::Step {
			step: name,
			locator: locator.clone(),
			source,
		})?;

		let elapsed_ms = started.elapsed().as_millis() as u64;
		info!(target = "mobi::scenario", step = name, locator = locator.as_deref(), elapsed_ms, "step done");
		self.records.push(StepRecord {
			name: name.to_string(),
			locator,
			elapsed_ms,
		});
		Ok(value)
	}

	fn into_records(self) -> Vec<StepRecord> {
		self.records
	}
}

fn expect_text(step: &'static str, locator: &Locator, expected: &str, actual: String) -> Result<()> {
	if actual == expected {
		return Ok(());
	}
	Err(MobiError::Assertion {
		step,
		locator: locator.to_string(),
		expected: expected.to_string(),
		actual,
	})
}

//! Polling waits for UI that renders asynchronously.
//!
//! A probe returns one of three outcomes:
//!
//! - `Ok(Some(value))`: condition met, the wait returns `value` immediately
//! - `Ok(None)`: not there yet, sleep one interval and try again
//! - `Err(e)`: hard failure (server unreachable, session gone), returned at once
//!
//! Only "not there yet" is retried. The probe always runs at least once, and
//! a condition that never holds fails with [`Error::Timeout`] roughly
//! `timeout` after the first attempt (never later than one interval past it).

use std::future::Future;
use std::time::Duration;

use mobi_protocol::{ErrorCode, Locator};
use mobi_runtime::{Error, Result};
use tokio::time::Instant;
use tracing::debug;

use crate::element::Element;
use crate::session::Session;

/// Polling cadence when none is given.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Bounded retry: a timeout plus a polling interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wait {
	timeout: Duration,
	interval: Duration,
}

impl Wait {
	/// Creates a wait with [`DEFAULT_POLL_INTERVAL`].
	pub fn new(timeout: Duration) -> Self {
		Self {
			timeout,
			interval: DEFAULT_POLL_INTERVAL,
		}
	}

	/// Sets the polling interval.
	pub fn interval(mut self, interval: Duration) -> Self {
		self.interval = interval;
		self
	}

	pub fn timeout(&self) -> Duration {
		self.timeout
	}

	pub fn poll_interval(&self) -> Duration {
		self.interval
	}

	/// Runs `probe` until it yields a value, fails hard, or time runs out.
	///
	/// `condition` names what is being waited for and ends up in the
	/// [`Error::Timeout`] message.
	pub async fn until<T, F, Fut>(&self, condition: &str, mut probe: F) -> Result<T>
	where
		F: FnMut() -> Fut,
		Fut: Future<Output = Result<Option<T>>>,
	{
		let start = Instant::now();
		let deadline = start + self.timeout;
		let mut attempts: u32 = 0;

		loop {
			attempts += 1;
			if let Some(value) = probe().await? {
				debug!(
					target = "mobi::wait",
					condition,
					attempts,
					elapsed_ms = start.elapsed().as_millis() as u64,
					"condition met"
				);
				return Ok(value);
			}

			let now = Instant::now();
			if now >= deadline {
				debug!(target = "mobi::wait", condition, attempts, "timed out");
				return Err(Error::Timeout {
					ms: self.timeout.as_millis() as u64,
					condition: condition.to_string(),
				});
			}

			tokio::time::sleep(self.interval.min(deadline - now)).await;
		}
	}
}

/// A [`Wait`] bound to a [`Session`], with element-oriented conditions.
#[derive(Debug, Clone, Copy)]
pub struct SessionWait<'a> {
	session: &'a Session,
	wait: Wait,
}

impl<'a> SessionWait<'a> {
	pub(crate) fn new(session: &'a Session, wait: Wait) -> Self {
		Self { session, wait }
	}

	/// Sets the polling interval.
	pub fn interval(mut self, interval: Duration) -> Self {
		self.wait = self.wait.interval(interval);
		self
	}

	/// Waits until an element matching `locator` is present.
	///
	/// Presence only: the element may still be hidden or disabled.
	pub async fn element(&self, locator: &Locator) -> Result<Element> {
		let session = self.session;
		self.wait
			.until(&locator.to_string(), || session.try_find_element(locator))
			.await
	}

	/// Waits until an element matching `locator` is present and displayed.
	pub async fn displayed(&self, locator: &Locator) -> Result<Element> {
		let session = self.session;
		let condition = format!("{locator} to be displayed");
		self.wait
			.until(&condition, || async move {
				let Some(element) = session.try_find_element(locator).await? else {
					return Ok(None);
				};
				match element.is_displayed().await {
					Ok(true) => Ok(Some(element)),
					Ok(false) => Ok(None),
					// Re-rendered between find and query; look it up again.
					Err(Error::Remote {
						code: ErrorCode::StaleElementReference,
						..
					}) => Ok(None),
					Err(e) => Err(e),
				}
			})
			.await
	}

	/// Waits on an arbitrary session condition.
	pub async fn until<T, F, Fut>(&self, condition: &str, mut probe: F) -> Result<T>
	where
		F: FnMut(&'a Session) -> Fut,
		Fut: Future<Output = Result<Option<T>>>,
	{
		let session = self.session;
		self.wait.until(condition, || probe(session)).await
	}
}

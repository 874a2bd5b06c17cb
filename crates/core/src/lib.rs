//! mobi: typed WebDriver/Appium client for mobile UI tests
//!
//! A thin async client over the remote-automation wire protocol: create a
//! session from typed [`Capabilities`], locate elements, interact with them,
//! and tolerate asynchronous rendering with a polling [`Wait`].
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//!
//! use mobi::{Capabilities, Locator, Session};
//!
//! #[tokio::main]
//! async fn main() -> mobi::Result<()> {
//!     let caps = Capabilities::ios("16.2", "iPhone 14 Pro", "/path/to/TheApp.app.zip");
//!     let session = Session::create("http://localhost:4723", &caps).await?;
//!
//!     let wait = session.wait(Duration::from_secs(10));
//!     wait.element(&Locator::accessibility_id("Echo Box")).await?.click().await?;
//!     wait.element(&Locator::accessibility_id("messageInput")).await?.send_keys("Hello").await?;
//!     session.find_element(&Locator::accessibility_id("messageSaveBtn")).await?.click().await?;
//!
//!     let saved = session.find_element(&Locator::accessibility_id("savedMessage")).await?.text().await?;
//!     assert_eq!(saved, "Hello");
//!
//!     session.close().await
//! }
//! ```

pub mod element;
pub mod session;
pub mod wait;

pub use element::Element;
pub use mobi_protocol::{AutomationName, Capabilities, ErrorCode, Locator, PlatformName, Strategy};
pub use mobi_runtime::{DEFAULT_REQUEST_TIMEOUT, Error, HttpTransport, Result};
pub use session::Session;
pub use wait::{DEFAULT_POLL_INTERVAL, SessionWait, Wait};

//! mobi runtime: transport, session channel, and errors
//!
//! This crate provides the low-level plumbing for talking to a remote
//! automation server (Appium or any W3C WebDriver endpoint):
//!
//! - **Transport**: one HTTP round trip per command, error bodies mapped to [`Error`]
//! - **Channel**: commands scoped to `/session/{id}/`
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   mobi-rs    │  Session, Element, Wait
//! └──────┬───────┘
//!        │ Channel
//! ┌──────▼───────┐
//! │ mobi-runtime │  This crate
//! │  ┌────────┐  │
//! │  │ Trans  │  │  reqwest over HTTP
//! │  └────────┘  │
//! └──────────────┘
//! ```

pub mod channel;
pub mod error;
pub mod transport;

pub use channel::Channel;
pub use error::{Error, Result};
pub use transport::{DEFAULT_REQUEST_TIMEOUT, HttpTransport, Method};

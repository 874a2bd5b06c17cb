//! Wire types for the WebDriver protocol as spoken by Appium.
//!
//! This crate contains the serde-serializable types exchanged with a remote
//! automation server over HTTP. These types represent the "protocol layer":
//! the shapes of data as they appear on the wire.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! - **Pure data**: No behavior beyond serialization/deserialization
//! - **1:1 with protocol**: Match the W3C WebDriver JSON shapes (plus `appium:` vendor keys)
//! - **Stable**: Changes only when the wire protocol changes
//!
//! Higher-level ergonomic APIs are built on top of these types in `mobi-rs`.

pub mod capabilities;
pub mod locator;
pub mod types;

pub use capabilities::*;
pub use locator::*;
pub use types::*;

//! Command-line front end for `mobi`: configuration, the Echo Box scenario,
//! scoped sessions and structured output.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod scenario;
pub mod session_helpers;

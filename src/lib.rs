//! serverctl - command line launcher for the server
//!
//! The command tree is assembled at runtime from the configuration property
//! registry, so every configurable property is also available as a flag.
//! Startup failures are reported with one message per configuration problem.

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod exitcode;
pub mod launcher;
pub mod logging;

// Re-export commonly used types
pub use error::{ConfigurationError, LaunchError, Result};

/// Current version of serverctl
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

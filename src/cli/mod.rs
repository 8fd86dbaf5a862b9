//! CLI interface and argument parsing
//!
//! This module builds the command tree, parses the process arguments and
//! reports failures.

pub mod app;
pub mod args;
pub mod report;
pub mod spec;

// Re-export main types
pub use app::*;
pub use args::filter_provider_args;
pub use report::{Reporter, Sink, StreamSink, TracingSink};
pub use spec::{build_specification, CommandSpec, OptionSpec};

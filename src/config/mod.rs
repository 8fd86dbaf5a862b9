//! Configuration metadata and sources
//!
//! This module describes which properties the server understands and
//! where their values come from.

pub mod features;
pub mod file;
pub mod mapper;

// Re-export main types
pub use features::*;
pub use file::*;
pub use mapper::*;

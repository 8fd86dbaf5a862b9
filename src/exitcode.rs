//! Process exit codes

/// Successful termination
pub const OK: i32 = 0;

/// Returned when a command fails during execution
pub const EXIT_CODE_ON_EXECUTION_EXCEPTION: i32 = 1;

/// Command line usage error, as reported by clap
pub const USAGE: i32 = 2;

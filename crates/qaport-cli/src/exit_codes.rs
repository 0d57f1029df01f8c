//! Exit codes of the `qaport` binary.
//! These codes are part of the public contract; CI jobs branch on them.

pub const SUCCESS: i32 = 0; // Run completed (dry runs included)
pub const FAILURE: i32 = 1; // Any fatal condition: credentials, input, remote call, no matches
pub const USAGE: i32 = 2; // Invalid arguments (reported by clap)

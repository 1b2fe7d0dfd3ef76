//! Exit codes of the `paramguard` binary. Part of the CLI contract.

pub const OK: i32 = 0;
pub const REJECTED: i32 = 1; // Request rejected: missing, malformed or forbidden parameters
pub const CONFIG_ERROR: i32 = 2; // Bad config, filters or request body

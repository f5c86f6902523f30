//! Stable exit codes for treeflood CLI commands.

/// Command succeeded; for `run`, every robot stopped at the root.
pub const OK: i32 = 0;
/// Invalid config, tree file, arguments, or a robot fault.
pub const INVALID: i32 = 1;
/// `treeflood run` hit `max_steps` before every robot stopped.
pub const INCOMPLETE: i32 = 2;

//! ID prefix constants.
//!
//! IDs are generated by the store as `{prefix}-{8 hex chars}`.

pub const PREFIX_USER: &str = "usr";
pub const PREFIX_PROJECT: &str = "prj";
pub const PREFIX_TASK: &str = "tsk";
pub const PREFIX_HISTORY: &str = "hst";

/// All known prefixes, in table creation order.
pub const ALL_PREFIXES: &[&str] = &[PREFIX_USER, PREFIX_PROJECT, PREFIX_TASK, PREFIX_HISTORY];

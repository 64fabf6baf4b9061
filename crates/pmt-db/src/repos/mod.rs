//! Repository modules for PMT entities.
//!
//! Each module adds methods to `PmtService` via `impl PmtService` blocks.

pub mod directory;
pub mod history;
pub mod project;
pub mod task;
pub mod user;

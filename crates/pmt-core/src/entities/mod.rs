//! Entity structs for all PMT domain objects.
//!
//! Each entity maps to a table in the libSQL database. All structs derive
//! `Serialize`, `Deserialize`, and `JsonSchema` for JSON roundtrip and schema
//! validation.

mod history;
mod project;
mod task;
mod user;

pub use history::TaskHistory;
pub use project::Project;
pub use task::Task;
pub use user::User;

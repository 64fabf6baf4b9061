mod project;
mod task;
mod user;

pub use project::ProjectCommands;
pub use task::{TaskCommands, TaskCreateArgs, TaskUpdateArgs};
pub use user::UserCommands;

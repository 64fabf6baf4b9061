use clap::Subcommand;

use crate::cli::subcommands::{ProjectCommands, TaskCommands, UserCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Users (assignees and actors).
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Projects.
    Project {
        #[command(subcommand)]
        action: ProjectCommands,
    },
    /// Tasks and their history.
    Task {
        #[command(subcommand)]
        action: TaskCommands,
    },
}

use clap::Subcommand;

/// User commands.
#[derive(Clone, Debug, Subcommand)]
pub enum UserCommands {
    /// Register a user.
    Add {
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: Option<String>,
    },
}

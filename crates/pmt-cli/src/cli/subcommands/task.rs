use clap::{Args, Subcommand};

/// Task commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TaskCommands {
    /// Create a task.
    Create(TaskCreateArgs),
    /// Update a task. Only the given fields change; an empty value clears
    /// the field (`--assignee-id ""` unassigns).
    Update(TaskUpdateArgs),
    /// Get a task by ID.
    Get {
        #[arg(long)]
        project: String,
        id: String,
    },
    /// List the tasks of a project, newest first.
    List {
        #[arg(long)]
        project: String,
    },
    /// Show the change history of a task, newest first.
    History {
        #[arg(long)]
        project: String,
        id: String,
    },
}

/// Arguments for `pmt task create`.
#[derive(Clone, Debug, Args)]
pub struct TaskCreateArgs {
    #[arg(long)]
    pub project: String,
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: Option<String>,
    /// TODO, IN_PROGRESS or DONE
    #[arg(long)]
    pub status: Option<String>,
    /// LOW, MEDIUM or HIGH
    #[arg(long)]
    pub priority: Option<String>,
    /// yyyy-mm-dd
    #[arg(long)]
    pub deadline: Option<String>,
    /// yyyy-mm-dd
    #[arg(long)]
    pub end_date: Option<String>,
    #[arg(long)]
    pub assignee_id: Option<String>,
    #[arg(long)]
    pub assignee_email: Option<String>,
    /// User ID credited with the change.
    #[arg(long)]
    pub actor: Option<String>,
}

/// Arguments for `pmt task update`.
#[derive(Clone, Debug, Args)]
pub struct TaskUpdateArgs {
    #[arg(long)]
    pub project: String,
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub priority: Option<String>,
    #[arg(long)]
    pub deadline: Option<String>,
    #[arg(long)]
    pub end_date: Option<String>,
    #[arg(long)]
    pub assignee_id: Option<String>,
    #[arg(long)]
    pub assignee_email: Option<String>,
    /// User ID credited with the change.
    #[arg(long)]
    pub actor: Option<String>,
}

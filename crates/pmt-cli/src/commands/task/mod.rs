mod create;
mod get;
mod history;
mod list;
mod update;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::TaskCommands;
use crate::context::AppContext;

/// Handle `pmt task`.
pub async fn handle(
    action: TaskCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        TaskCommands::Create(args) => create::run(args, ctx, flags).await,
        TaskCommands::Update(args) => update::run(args, ctx, flags).await,
        TaskCommands::Get { project, id } => get::run(&project, &id, ctx, flags).await,
        TaskCommands::List { project } => list::run(&project, ctx, flags).await,
        TaskCommands::History { project, id } => history::run(&project, &id, ctx, flags).await,
    }
}

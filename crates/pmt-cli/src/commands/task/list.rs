use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(project: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let tasks = ctx.service.list_tasks(project).await?;
    output(&tasks, flags.format)
}

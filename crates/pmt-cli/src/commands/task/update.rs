use pmt_core::mutator::TaskUpdateRequest;
use pmt_core::patch::Patch;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::TaskUpdateArgs;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    args: TaskUpdateArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let project = args.project.clone();
    let id = args.id.clone();
    let actor = args.actor.clone();
    let request = into_request(args);
    let task = ctx
        .service
        .update_task(&project, &id, &request, actor.as_deref())
        .await?;
    output(&task, flags.format)
}

/// Absent flags stay `Unset`; a given flag, even an empty one, is `Set`.
fn into_request(args: TaskUpdateArgs) -> TaskUpdateRequest {
    TaskUpdateRequest {
        title: Patch::from(args.title),
        description: Patch::from(args.description),
        status: Patch::from(args.status),
        priority: Patch::from(args.priority),
        deadline: Patch::from(args.deadline),
        end_date: Patch::from(args.end_date),
        assignee_id: Patch::from(args.assignee_id),
        assignee_email: Patch::from(args.assignee_email),
    }
}

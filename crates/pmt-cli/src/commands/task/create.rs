use pmt_core::mutator::NewTask;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::TaskCreateArgs;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    args: TaskCreateArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let (project, actor, new) = into_new_task(args);
    let task = ctx
        .service
        .create_task(&project, &new, actor.as_deref())
        .await?;
    output(&task, flags.format)
}

/// Split the arguments into project, actor, and the creation input.
fn into_new_task(args: TaskCreateArgs) -> (String, Option<String>, NewTask) {
    let new = NewTask {
        title: args.title,
        description: args.description,
        status: args.status,
        priority: args.priority,
        deadline: args.deadline,
        end_date: args.end_date,
        assignee_id: args.assignee_id,
        assignee_email: args.assignee_email,
    };
    (args.project, args.actor, new)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn maps_every_flag() {
        let args = TaskCreateArgs {
            project: "prj-1".into(),
            title: "Fix bug".into(),
            description: Some("Crash on save".into()),
            status: Some("IN_PROGRESS".into()),
            priority: Some("HIGH".into()),
            deadline: Some("2026-12-01".into()),
            end_date: None,
            assignee_id: None,
            assignee_email: Some("bob@example.com".into()),
            actor: Some("usr-1".into()),
        };
        let (project, actor, new) = into_new_task(args);
        assert_eq!(project, "prj-1");
        assert_eq!(actor.as_deref(), Some("usr-1"));
        assert_eq!(new.title, "Fix bug");
        assert_eq!(new.priority.as_deref(), Some("HIGH"));
        assert_eq!(new.assignee_email.as_deref(), Some("bob@example.com"));
        assert_eq!(new.end_date, None);
    }
}

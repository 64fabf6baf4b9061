use crate::cli::GlobalFlags;
use crate::cli::subcommands::UserCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `pmt user`.
pub async fn handle(
    action: &UserCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        UserCommands::Add { email, username } => {
            let user = ctx.service.create_user(email, username.as_deref()).await?;
            output(&user, flags.format)
        }
    }
}

use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `pmt` binary.
#[derive(Debug, Parser)]
#[command(name = "pmt", version, about = "PMT - tasks with audit history")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Database path (overrides `database.path` from config)
    #[arg(long, global = true)]
    pub db: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            db: self.db.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;

    use super::subcommands::{ProjectCommands, TaskCommands, UserCommands};
    use super::{Cli, Commands, GlobalFlags, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "pmt",
            "--format",
            "raw",
            "--verbose",
            "task",
            "list",
            "--project",
            "prj-1",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Task {
                action: TaskCommands::List { .. }
            }
        ));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["pmt", "project", "add", "--name", "Website", "--quiet"])
            .expect("cli should parse");

        assert!(cli.quiet);
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Project {
                action: ProjectCommands::Add { name },
            } => assert_eq!(name, "Website"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed =
            Cli::try_parse_from(["pmt", "--format", "table", "user", "add", "--email", "a@b.c"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from([
            "pmt",
            "--db",
            "/tmp/demo.db",
            "user",
            "add",
            "--email",
            "ada@example.com",
        ])
        .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.db.as_deref(), Some("/tmp/demo.db"));
        assert!(matches!(
            cli.command,
            Commands::User {
                action: UserCommands::Add { username: None, .. }
            }
        ));
    }

    #[test]
    fn empty_assignee_flag_is_kept_for_unassign() {
        let cli = Cli::try_parse_from([
            "pmt",
            "task",
            "update",
            "--project",
            "prj-1",
            "tsk-1",
            "--assignee-id",
            "",
        ])
        .expect("cli should parse");
        match cli.command {
            Commands::Task {
                action: TaskCommands::Update(args),
            } => {
                assert_eq!(args.assignee_id.as_deref(), Some(""));
                assert_eq!(args.title, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn task_create_requires_title() {
        let parsed = Cli::try_parse_from(["pmt", "task", "create", "--project", "prj-1"]);
        assert!(parsed.is_err());
    }
}

//! CLI argument parsing using clap derive

use std::path::PathBuf;

use aos_core::{Scope, Tool};
use clap::{Parser, Subcommand};

/// Agent OS - Install layered AI coding standards without losing local edits
#[derive(Parser, Debug)]
#[command(name = "agent-os")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// User-level installation directory [default: ~/.agent-os]
    #[arg(long, global = true, env = "AGENT_OS_HOME")]
    pub home: Option<PathBuf>,

    /// Base layer source for `install base` [default: current directory]
    #[arg(long, global = true, env = "AGENT_OS_SOURCE")]
    pub source: Option<PathBuf>,

    /// Team layer directory
    #[arg(long, global = true, env = "AGENT_OS_TEAM")]
    pub team: Option<PathBuf>,

    /// Project directory [default: current directory]
    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Install the base layer or a project
    ///
    /// Examples:
    ///   agent-os install base                     # Into ~/.agent-os
    ///   agent-os install project -t claude-code   # Into ./.agent-os
    Install {
        /// What to install: base or project
        target: Scope,

        /// Tool integrations to include (claude-code, cursor, copilot)
        #[arg(short, long = "tool")]
        tools: Vec<Tool>,

        /// Back up and overwrite locally edited files
        #[arg(long)]
        force: bool,

        /// Preview changes without applying them
        #[arg(long)]
        dry_run: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Refresh an existing installation from its layers
    Sync {
        /// Sync the project installation instead of the user-level one
        #[arg(long)]
        project: bool,

        /// Back up and overwrite locally edited files
        #[arg(long)]
        force: bool,

        /// Preview changes without applying them
        #[arg(long)]
        dry_run: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show what a sync would change
    Status {
        /// Inspect the project installation instead of the user-level one
        #[arg(long)]
        project: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show upstream changes for locally edited files
    Diff {
        /// Inspect the project installation instead of the user-level one
        #[arg(long)]
        project: bool,
    },

    /// Forget the installation state; installed files are kept
    Reset {
        /// Reset the project installation instead of the user-level one
        #[arg(long)]
        project: bool,
    },
}

/// Scope selected by a `--project` flag
pub fn scope_of(project: bool) -> Scope {
    if project { Scope::Project } else { Scope::Base }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_no_args() {
        let cli = Cli::parse_from(["agent-os"]);
        assert!(!cli.verbose);
        assert!(cli.command.is_none());
    }

    #[test]
    fn parse_install_base() {
        let cli = Cli::parse_from(["agent-os", "install", "base"]);
        assert_eq!(
            cli.command,
            Some(Commands::Install {
                target: Scope::Base,
                tools: vec![],
                force: false,
                dry_run: false,
                json: false,
            })
        );
    }

    #[test]
    fn parse_install_project_with_tools() {
        let cli = Cli::parse_from([
            "agent-os",
            "install",
            "project",
            "--tool",
            "claude-code",
            "-t",
            "cursor",
            "--force",
        ]);
        match cli.command {
            Some(Commands::Install {
                target,
                tools,
                force,
                ..
            }) => {
                assert_eq!(target, Scope::Project);
                assert_eq!(tools, vec![Tool::ClaudeCode, Tool::Cursor]);
                assert!(force);
            }
            other => panic!("Expected Install command, got {:?}", other),
        }
    }

    #[test]
    fn parse_rejects_unknown_tool() {
        let result = Cli::try_parse_from(["agent-os", "install", "base", "--tool", "vscode"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_rejects_unknown_target() {
        let result = Cli::try_parse_from(["agent-os", "install", "team"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_sync_flags() {
        let cli = Cli::parse_from(["agent-os", "sync", "--project", "--dry-run", "--json"]);
        assert_eq!(
            cli.command,
            Some(Commands::Sync {
                project: true,
                force: false,
                dry_run: true,
                json: true,
            })
        );
    }

    #[test]
    fn parse_global_paths_after_subcommand() {
        let cli = Cli::parse_from([
            "agent-os",
            "status",
            "--home",
            "/tmp/home",
            "--project-dir",
            "/tmp/project",
        ]);
        assert_eq!(cli.home, Some(PathBuf::from("/tmp/home")));
        assert_eq!(cli.project_dir, Some(PathBuf::from("/tmp/project")));
        assert!(matches!(cli.command, Some(Commands::Status { project: false, json: false })));
    }

    #[test]
    fn scope_from_project_flag() {
        assert_eq!(scope_of(true), Scope::Project);
        assert_eq!(scope_of(false), Scope::Base);
    }
}

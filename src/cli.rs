//! Command line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "repliq",
    version,
    about = "Rewrites clipboard text with keyword replacement rules"
)]
pub struct Cli {
    /// Config file to use instead of the one in the data directory.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// `repliq` with no subcommand behaves like `repliq run`.
    pub fn resolved_command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Run(RunArgs::default()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Watch the clipboard until interrupted.
    Run(RunArgs),

    /// Inspect or edit the saved rules.
    #[command(subcommand)]
    Rules(RulesCommand),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct RunArgs {
    /// Start with monitoring paused (send SIGUSR1 to toggle on Unix).
    #[arg(long)]
    pub paused: bool,

    /// Poll interval in milliseconds, overriding the config file.
    #[arg(long, value_name = "MS")]
    pub poll_interval_ms: Option<u64>,
}

/// Rule indices are zero-based, as printed by `rules list`.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum RulesCommand {
    /// Print the rules in priority order.
    List,

    /// Append a rule at the lowest priority.
    Add {
        keyword: String,
        replacement: String,

        /// Only fire when the clipboard text starts with this prefix.
        #[arg(long)]
        prefix: Option<String>,

        /// Save the rule disabled.
        #[arg(long)]
        disabled: bool,
    },

    Remove { index: usize },

    /// Move a rule to a new position.
    Move { from: usize, to: usize },

    Enable { index: usize },

    Disable { index: usize },

    /// Set or, when omitted, clear a rule's required prefix.
    Prefix { index: usize, prefix: Option<String> },
}

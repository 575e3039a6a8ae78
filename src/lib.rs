//! RepliQ
//!
//! Watches the system clipboard and rewrites copied text with an ordered
//! list of keyword replacement rules.

pub mod bootstrap;
pub mod cli;

use std::io;

use anyhow::Result;
use rq_core::ports::AppDirsPort;

use bootstrap::wiring::{self, default_app_dirs};
use cli::{Cli, Command};

/// Runs the parsed command line against the real platform.
pub async fn run_cli(cli: Cli) -> Result<()> {
    let app_dirs = default_app_dirs();
    run_cli_with(cli, &app_dirs).await
}

/// Runs the parsed command line with directories resolved by `app_dirs`.
pub async fn run_cli_with(cli: Cli, app_dirs: &dyn AppDirsPort) -> Result<()> {
    let (paths, mut config) = wiring::resolve_environment(app_dirs, cli.config.as_deref())?;

    match cli.resolved_command() {
        Command::Run(args) => {
            if args.poll_interval_ms.is_some() {
                config.poll_interval_ms = args.poll_interval_ms;
            }
            let clipboard = wiring::system_clipboard()?;
            let deps = wiring::wire_dependencies(&paths, config, clipboard);
            bootstrap::run_monitor(&deps, args.paused).await
        }
        Command::Rules(command) => {
            // Rule editing never touches the clipboard.
            let clipboard = std::sync::Arc::new(rq_platform::MemoryClipboard::new());
            let deps = wiring::wire_dependencies(&paths, config, clipboard);
            bootstrap::run_rules_command(&deps, command, &mut io::stdout().lock()).await
        }
    }
}

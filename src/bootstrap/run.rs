//! Entry points behind each subcommand.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use rq_app::usecases::RuleEdit;
use rq_core::ports::ClipboardObserver;
use rq_core::{ClipboardEvent, Rule};
use tracing::{info, info_span, warn, Instrument};

use super::wiring::AppDeps;
use crate::cli::RulesCommand;

/// Logs every clipboard event.
#[derive(Debug, Default)]
pub struct LoggingObserver;

impl ClipboardObserver for LoggingObserver {
    fn on_event(&self, event: &ClipboardEvent) {
        match event {
            ClipboardEvent::ContentChanged {
                original,
                final_text,
            } => info!(
                len = original.len(),
                replaced = original != final_text,
                "Clipboard content changed"
            ),
            ClipboardEvent::RuleApplied { rule, .. } => {
                info!(rule = %rule, "Rule applied")
            }
            ClipboardEvent::MonitoringChanged { enabled } => {
                info!(enabled, "Monitoring state changed")
            }
        }
    }
}

/// Loads the rules and watches the clipboard until Ctrl-C.
pub async fn run_monitor(deps: &AppDeps, start_paused: bool) -> Result<()> {
    let span = info_span!("app.run_monitor");

    async {
        deps.hub.subscribe(Arc::new(LoggingObserver));
        deps.hub.subscribe(deps.history.clone());

        deps.load_rules().execute().await;

        let start_on_launch = deps.config.start_on_launch.unwrap_or(true) && !start_paused;
        if start_on_launch {
            deps.start_watcher().execute().await?;
        } else {
            info!("Monitoring paused at launch");
        }

        wait_for_shutdown(deps).await?;

        deps.stop_watcher().execute().await?;
        let stats = deps.history.stats();
        info!(
            captured = stats.total,
            replaced = stats.replaced,
            "Shutting down"
        );
        deps.watcher.shutdown();
        Ok(())
    }
    .instrument(span)
    .await
}

#[cfg(unix)]
async fn wait_for_shutdown(deps: &AppDeps) -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut toggle = signal(SignalKind::user_defined1()).context("install SIGUSR1 handler")?;
    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                return result.context("wait for Ctrl-C");
            }
            _ = toggle.recv() => {
                if let Err(e) = deps.toggle_monitoring().execute().await {
                    warn!(error = %e, "Failed to toggle monitoring");
                }
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown(_deps: &AppDeps) -> Result<()> {
    tokio::signal::ctrl_c().await.context("wait for Ctrl-C")
}

/// Runs one `repliq rules ...` command, writing user-facing output to `out`.
pub async fn run_rules_command(
    deps: &AppDeps,
    command: RulesCommand,
    out: &mut impl Write,
) -> Result<()> {
    deps.load_rules().execute().await;

    let edit = match command {
        RulesCommand::List => return print_rules(&deps.rules.snapshot(), out),
        RulesCommand::Add {
            keyword,
            replacement,
            prefix,
            disabled,
        } => RuleEdit::Add(
            Rule::new(keyword, replacement)?
                .with_required_prefix(prefix)
                .with_enabled(!disabled),
        ),
        RulesCommand::Remove { index } => RuleEdit::Remove { index },
        RulesCommand::Move { from, to } => RuleEdit::Move { from, to },
        RulesCommand::Enable { index } => RuleEdit::SetEnabled {
            index,
            enabled: true,
        },
        RulesCommand::Disable { index } => RuleEdit::SetEnabled {
            index,
            enabled: false,
        },
        RulesCommand::Prefix { index, prefix } => RuleEdit::SetPrefix { index, prefix },
    };

    let rules = deps.edit_rules().execute(edit).await?;
    writeln!(out, "Saved to {}", deps.rules_path.display())?;
    print_rules(&rules, out)
}

fn print_rules(rules: &[Rule], out: &mut impl Write) -> Result<()> {
    if rules.is_empty() {
        writeln!(out, "No rules.")?;
        return Ok(());
    }
    for (index, rule) in rules.iter().enumerate() {
        writeln!(out, "{index:>3}: {rule}")?;
    }
    Ok(())
}

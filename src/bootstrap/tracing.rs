//! Tracing configuration for RepliQ
//!
//! ## Layers / 日志层
//!
//! - **Console**: human-readable lines on stderr, so `repliq rules list`
//!   output on stdout stays clean
//! - **File**: `repliq.log` under the logs directory, written through a
//!   non-blocking appender; skipped with a warning when the directory is
//!   unavailable
//! - **Filter**: `RUST_LOG` wins; otherwise debug in dev builds, info in release

use std::{fs, io, path::Path, sync::OnceLock};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, fmt::writer::BoxMakeWriter, prelude::*, registry};

const LOG_FILE_NAME: &str = "repliq.log";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

fn is_development() -> bool {
    cfg!(debug_assertions)
}

/// Default filter directives when `RUST_LOG` is not set.
fn build_filter_directives(is_dev: bool) -> Vec<String> {
    let level = if is_dev { "debug" } else { "info" };
    vec![
        level.to_string(),
        format!("rq_app={level}"),
        format!("rq_infra={level}"),
        // Per-tick counter reads are trace level; keep them out unless asked.
        format!("rq_platform={}", if is_dev { "debug" } else { "warn" }),
        "clipboard_rs=warn".to_string(),
    ]
}

/// Installs the global subscriber.
///
/// Call once, early in `main`. `logs_dir` of `None` means console only.
///
/// ## Errors / 错误
///
/// Returns `Err` if a global subscriber is already registered.
pub fn init_tracing_subscriber(logs_dir: Option<&Path>) -> anyhow::Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(build_filter_directives(is_development()).join(","))
    });

    let console_writer: BoxMakeWriter = BoxMakeWriter::new(io::stderr);
    let file_writer = match logs_dir.map(build_file_writer).transpose() {
        Ok(writer) => writer,
        Err(err) => {
            eprintln!("Failed to initialize file logging, falling back to console: {err:#}");
            None
        }
    };

    let console_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
        .with_level(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(console_writer);

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
            .with_level(true)
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_ansi(false)
            .with_writer(writer)
    });

    registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

fn build_file_writer(logs_dir: &Path) -> anyhow::Result<NonBlocking> {
    fs::create_dir_all(logs_dir)?;

    let file_appender = tracing_appender::rolling::never(logs_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    LOG_GUARD
        .set(guard)
        .map_err(|_| anyhow::anyhow!("Tracing log guard already initialized"))?;

    Ok(non_blocking)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_directives() {
        let dev = build_filter_directives(true);
        assert!(dev.contains(&"debug".to_string()));
        assert!(dev.contains(&"rq_platform=debug".to_string()));

        let prod = build_filter_directives(false);
        assert!(prod.contains(&"info".to_string()));
        assert!(prod.contains(&"rq_app=info".to_string()));
        assert!(prod.contains(&"rq_platform=warn".to_string()));
    }

    #[test]
    fn directives_parse_as_env_filter() {
        for is_dev in [true, false] {
            let joined = build_filter_directives(is_dev).join(",");
            assert!(tracing_subscriber::EnvFilter::try_new(&joined).is_ok());
        }
    }
}

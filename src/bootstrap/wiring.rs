//! # Dependency Injection / 依赖注入模块
//!
//! The only place that depends on `rq-infra`, `rq-platform` and `rq-app`
//! together. It assembles; it does not decide. Everything past this point
//! talks to ports.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rq_app::usecases::{
    EditRules, LoadRules, StartClipboardWatcher, StopClipboardWatcher, ToggleMonitoring,
};
use rq_app::{
    AppPaths, ClipboardHistory, ClipboardWatcher, ObserverHub, RuleBook, WatcherConfig,
    DEFAULT_HISTORY_CAPACITY,
};
use rq_core::config::AppConfig;
use rq_core::ports::{AppDirsError, AppDirsPort, ClipboardPort, RuleRepositoryPort};
use rq_infra::FileRuleRepository;
use rq_platform::DirsAppDirsAdapter;

use super::config::{load_config, load_optional_config};

/// Result type for wiring operations
pub type WiringResult<T> = Result<T, WiringError>;

/// Errors during dependency injection
/// 依赖注入错误
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("Application directories unavailable: {0}")]
    AppDirs(#[from] AppDirsError),

    #[error("Config loading failed: {0}")]
    Config(String),

    #[error("Clipboard initialization failed: {0}")]
    Clipboard(String),
}

/// Resolves data directory paths and loads the config file.
///
/// An explicit `config_override` must exist; the default location may be
/// absent.
pub fn resolve_environment(
    app_dirs: &dyn AppDirsPort,
    config_override: Option<&Path>,
) -> WiringResult<(AppPaths, AppConfig)> {
    let paths = AppPaths::from_app_dirs(&app_dirs.get_app_dirs()?);

    let config = match config_override {
        Some(path) => load_config(path),
        None => load_optional_config(&paths.config_path),
    }
    .map_err(|e| WiringError::Config(format!("{e:#}")))?;

    Ok((paths.with_config(&config), config))
}

pub fn default_app_dirs() -> DirsAppDirsAdapter {
    DirsAppDirsAdapter::new()
}

/// Opens the platform clipboard.
pub fn system_clipboard() -> WiringResult<Arc<dyn ClipboardPort>> {
    rq_platform::system_clipboard().map_err(|e| WiringError::Clipboard(format!("{e:#}")))
}

/// The assembled application.
pub struct AppDeps {
    pub config: AppConfig,
    pub rules_path: PathBuf,
    pub rules: RuleBook,
    pub hub: Arc<ObserverHub>,
    pub history: Arc<ClipboardHistory>,
    pub watcher: Arc<ClipboardWatcher>,
    pub repository: Arc<dyn RuleRepositoryPort>,
}

impl AppDeps {
    pub fn load_rules(&self) -> LoadRules {
        LoadRules::new(self.repository.clone(), self.rules.clone())
    }

    pub fn edit_rules(&self) -> EditRules {
        EditRules::new(self.repository.clone(), self.rules.clone())
    }

    pub fn start_watcher(&self) -> StartClipboardWatcher {
        StartClipboardWatcher::new(self.watcher.clone())
    }

    pub fn stop_watcher(&self) -> StopClipboardWatcher {
        StopClipboardWatcher::new(self.watcher.clone())
    }

    pub fn toggle_monitoring(&self) -> ToggleMonitoring {
        ToggleMonitoring::new(self.watcher.clone())
    }
}

/// Wires every component around `clipboard`.
pub fn wire_dependencies(
    paths: &AppPaths,
    config: AppConfig,
    clipboard: Arc<dyn ClipboardPort>,
) -> AppDeps {
    let rules = RuleBook::default();
    let hub = Arc::new(ObserverHub::new());
    let history = Arc::new(ClipboardHistory::new(
        config.history_capacity.unwrap_or(DEFAULT_HISTORY_CAPACITY),
    ));
    let watcher = Arc::new(ClipboardWatcher::new(
        clipboard,
        rules.clone(),
        hub.clone(),
        WatcherConfig::from_app_config(&config),
    ));
    let repository: Arc<dyn RuleRepositoryPort> =
        Arc::new(FileRuleRepository::new(paths.rules_path.clone()));

    AppDeps {
        config,
        rules_path: paths.rules_path.clone(),
        rules,
        hub,
        history,
        watcher,
        repository,
    }
}

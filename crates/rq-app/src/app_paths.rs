use std::path::PathBuf;

use rq_core::app_dirs::AppDirs;
use rq_core::AppConfig;

/// Concrete file locations derived from the app data root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub rules_path: PathBuf,
    pub config_path: PathBuf,
    pub logs_dir: PathBuf,
}

impl AppPaths {
    pub fn from_app_dirs(dirs: &AppDirs) -> Self {
        Self {
            rules_path: dirs.app_data_root.join("rules.json"),
            config_path: dirs.app_data_root.join("config.toml"),
            logs_dir: dirs.app_data_root.join("logs"),
        }
    }

    /// Applies path overrides from the config file.
    pub fn with_config(mut self, config: &AppConfig) -> Self {
        if let Some(rules_path) = &config.rules_path {
            self.rules_path = rules_path.clone();
        }
        self
    }
}

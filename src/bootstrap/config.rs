//! # Configuration Loader / 配置加载器
//!
//! Reads the TOML config file into the [`AppConfig`] DTO. Pure data loading:
//! no validation and no defaults. Consumers (`WatcherConfig`,
//! `ClipboardHistory`) decide what an absent or out-of-range value means.

use anyhow::Context;
use std::path::Path;

use rq_core::config::AppConfig;
use tracing::debug;

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// # Errors / 错误
///
/// - File cannot be read (I/O error)
/// - Content is not valid TOML (parse error)
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}

/// Like [`load_config`], but a missing file yields an empty config.
pub fn load_optional_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    if !config_path.exists() {
        debug!(path = %config_path.display(), "No config file, using defaults");
        return Ok(AppConfig::empty());
    }
    load_config(config_path)
}

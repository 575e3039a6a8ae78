//! # Pure Data Module - Data Transfer Objects Only
//!
//! ## Responsibilities
//!
//! - Define configuration data structures
//! - Provide TOML → DTO mapping
//!
//! ## Prohibited
//!
//! - No validation logic
//! - No default value calculation
//!
//! A key missing from the file is recorded as `None`; callers decide what
//! the default is. Out-of-range values are kept as-is and clamped by the
//! component that consumes them.

use std::path::PathBuf;

/// Application configuration DTO (pure data, no logic)
/// 应用配置 DTO（纯数据，无逻辑）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// `[watcher] poll_interval_ms`
    pub poll_interval_ms: Option<u64>,

    /// `[watcher] start_on_launch`
    pub start_on_launch: Option<bool>,

    /// `[storage] rules_path` (path info only, no existence check)
    pub rules_path: Option<PathBuf>,

    /// `[history] capacity`
    pub history_capacity: Option<usize>,
}

impl AppConfig {
    /// Create AppConfig from TOML value
    /// 从 TOML 值创建 AppConfig
    ///
    /// Negative integers are read as absent since they cannot be represented.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        Ok(Self {
            poll_interval_ms: toml_value
                .get("watcher")
                .and_then(|w| w.get("poll_interval_ms"))
                .and_then(|v| v.as_integer())
                .and_then(|v| u64::try_from(v).ok()),
            start_on_launch: toml_value
                .get("watcher")
                .and_then(|w| w.get("start_on_launch"))
                .and_then(|v| v.as_bool()),
            rules_path: toml_value
                .get("storage")
                .and_then(|s| s.get("rules_path"))
                .and_then(|v| v.as_str())
                .map(PathBuf::from),
            history_capacity: toml_value
                .get("history")
                .and_then(|h| h.get("capacity"))
                .and_then(|v| v.as_integer())
                .and_then(|v| usize::try_from(v).ok()),
        })
    }

    /// Create empty AppConfig (every key absent)
    pub fn empty() -> Self {
        Self::default()
    }
}

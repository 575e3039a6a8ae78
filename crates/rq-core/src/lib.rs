//! # rq-core
//!
//! Core domain models and the rule engine for RepliQ.
//!
//! This crate contains pure business logic without any infrastructure dependencies.

pub mod app_dirs;
pub mod config;
pub mod engine;
pub mod event;
pub mod ports;
pub mod rule;

// Re-export commonly used types at the crate root
pub use config::AppConfig;
pub use engine::{apply, Outcome};
pub use event::ClipboardEvent;
pub use rule::{Rule, RuleError};

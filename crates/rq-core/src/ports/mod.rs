//! Port interfaces for the application layer
//!
//! Ports define the contract between the application logic (use cases)
//! and infrastructure implementations. The watcher, the observer hub and the
//! use cases depend only on these traits, so the platform clipboard and the
//! rule store can be swapped without touching them.

pub mod app_dirs;
mod clipboard;
pub mod errors;
mod observer;
pub mod rule_repository;
pub mod watcher_control;

pub use app_dirs::AppDirsPort;
pub use clipboard::ClipboardPort;
pub use errors::AppDirsError;
pub use observer::ClipboardObserver;
pub use rule_repository::{RuleFileMigrationPort, RuleRepositoryPort};
pub use watcher_control::{WatcherControlError, WatcherControlPort};

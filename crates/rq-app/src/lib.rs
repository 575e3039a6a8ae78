//! RepliQ Application Layer
//!
//! Runtime pieces that sit between the pure rule engine and the platform
//! adapters: the polling watcher, the observer hub, the shared rule list,
//! the in-memory history and the use cases driving them.

pub mod app_paths;
pub mod history;
pub mod hub;
pub mod rules;
pub mod usecases;
pub mod watcher;

pub use app_paths::AppPaths;
pub use history::{ClipboardHistory, HistoryItem, HistoryStats, DEFAULT_HISTORY_CAPACITY};
pub use hub::{ObserverHub, SubscriptionId};
pub use rules::RuleBook;
pub use watcher::{ClipboardWatcher, PollOutcome, SkipReason, WatcherConfig};

//! Business logic use cases
//!
//! ```text
//! LoadRules ──→ RuleBook ←── EditRules ──→ RuleRepositoryPort
//!                  ↓
//!           ClipboardWatcher ←── Start / Stop / ToggleMonitoring
//! ```

pub mod edit_rules;
pub mod load_rules;
pub mod start_clipboard_watcher;
pub mod stop_clipboard_watcher;
pub mod toggle_monitoring;

pub use edit_rules::{EditRules, EditRulesError, RuleEdit};
pub use load_rules::LoadRules;
pub use start_clipboard_watcher::{StartClipboardWatcher, StartClipboardWatcherError};
pub use stop_clipboard_watcher::{StopClipboardWatcher, StopClipboardWatcherError};
pub use toggle_monitoring::ToggleMonitoring;

//! Clipboard port - abstracts the system clipboard
//!
//! The watcher only needs a change counter plus plain-text read and write,
//! so any platform clipboard that can provide those three operations is
//! interchangeable.

use anyhow::Result;

/// Minimal system clipboard contract.
///
/// 系统剪贴板的最小契约：变更计数、读取文本、写入文本。
pub trait ClipboardPort: Send + Sync {
    /// Current change counter.
    ///
    /// The counter increases every time any process replaces the clipboard
    /// content.
    fn read_change_count(&self) -> Result<i64>;

    /// Current content as text.
    ///
    /// Returns `Ok(None)` when the clipboard holds no string representation
    /// (images, files, ...).
    fn read_text(&self) -> Result<Option<String>>;

    /// Replace the clipboard content with `text`.
    ///
    /// Returns the change counter produced by this write.
    fn write_text(&self, text: &str) -> Result<i64>;
}

//! RepliQ platform adapters
//!
//! Implementations of the `rq-core` ports that talk to the operating
//! system: the clipboard and the per-user data directory.

pub mod app_dirs;
pub mod clipboard;

pub use app_dirs::DirsAppDirsAdapter;
pub use clipboard::{system_clipboard, ClipboardRsClipboard, MemoryClipboard};

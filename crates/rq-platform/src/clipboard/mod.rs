//! Clipboard adapters implementing [`ClipboardPort`].

mod common;
mod memory;
pub mod platform;

use std::sync::Arc;

use anyhow::Result;
use rq_core::ports::ClipboardPort;

pub use common::ClipboardRsClipboard;
pub use memory::MemoryClipboard;

/// Opens the best clipboard adapter for the current platform.
///
/// macOS uses the native pasteboard change counter; elsewhere the counter is
/// derived from content fingerprints.
pub fn system_clipboard() -> Result<Arc<dyn ClipboardPort>> {
    #[cfg(target_os = "macos")]
    {
        Ok(Arc::new(platform::MacOsPasteboard::new()))
    }

    #[cfg(not(target_os = "macos"))]
    {
        Ok(Arc::new(ClipboardRsClipboard::new()?))
    }
}

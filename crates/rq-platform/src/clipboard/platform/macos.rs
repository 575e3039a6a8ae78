use anyhow::{ensure, Result};
use objc2_app_kit::{NSPasteboard, NSPasteboardTypeString};
use objc2_foundation::NSString;
use rq_core::ports::ClipboardPort;
use tracing::{debug, debug_span, trace};

/// General pasteboard accessed through AppKit.
///
/// Uses the pasteboard's own `changeCount`, so writes from any process are
/// detected without reading the content.
#[derive(Debug, Default)]
pub struct MacOsPasteboard;

impl MacOsPasteboard {
    pub fn new() -> Self {
        Self
    }
}

#[allow(unused_unsafe)]
impl ClipboardPort for MacOsPasteboard {
    fn read_change_count(&self) -> Result<i64> {
        let count = unsafe { NSPasteboard::generalPasteboard().changeCount() } as i64;
        trace!(count, "Read pasteboard change count");
        Ok(count)
    }

    fn read_text(&self) -> Result<Option<String>> {
        let span = debug_span!("platform.macos.read_text");
        span.in_scope(|| {
            let text = unsafe {
                NSPasteboard::generalPasteboard()
                    .stringForType(NSPasteboardTypeString)
                    .map(|s| s.to_string())
            };
            debug!(has_text = text.is_some(), "Read pasteboard text");
            Ok(text)
        })
    }

    fn write_text(&self, text: &str) -> Result<i64> {
        let span = debug_span!("platform.macos.write_text", len = text.len());
        span.in_scope(|| {
            let count = unsafe {
                let pasteboard = NSPasteboard::generalPasteboard();
                pasteboard.clearContents();
                let written =
                    pasteboard.setString_forType(&NSString::from_str(text), NSPasteboardTypeString);
                ensure!(written, "pasteboard rejected the string");
                pasteboard.changeCount() as i64
            };
            debug!(count, "Wrote pasteboard text");
            Ok(count)
        })
    }
}

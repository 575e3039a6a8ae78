use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{anyhow, Result};
use clipboard_rs::{Clipboard, ClipboardContext, ContentFormat};
use rq_core::ports::ClipboardPort;
use tracing::{debug, debug_span, trace};

fn map_clipboard_err<T>(
    result: std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>,
) -> Result<T> {
    result.map_err(|e| anyhow!(e))
}

/// Synthetic change counter for clipboards that do not expose one.
///
/// Every observation is fingerprinted; the counter moves whenever the
/// fingerprint differs from the previous one, and on every write made
/// through this adapter.
#[derive(Debug, Default)]
struct ChangeTracker {
    counter: i64,
    last_fingerprint: Option<blake3::Hash>,
}

impl ChangeTracker {
    fn observe(&mut self, fingerprint: blake3::Hash) -> i64 {
        if self.last_fingerprint != Some(fingerprint) {
            self.counter += 1;
            self.last_fingerprint = Some(fingerprint);
        }
        self.counter
    }

    fn record_write(&mut self, fingerprint: blake3::Hash) -> i64 {
        self.counter += 1;
        self.last_fingerprint = Some(fingerprint);
        self.counter
    }
}

fn text_fingerprint(text: &str) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"text\0");
    hasher.update(text.as_bytes());
    hasher.finalize()
}

fn formats_fingerprint(formats: &[String]) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"formats\0");
    for format in formats {
        hasher.update(format.as_bytes());
        hasher.update(b"\0");
    }
    hasher.finalize()
}

/// Portable clipboard backed by `clipboard-rs`.
///
/// 基于 clipboard-rs 的跨平台剪贴板实现，变更计数由内容指纹推导。
pub struct ClipboardRsClipboard {
    inner: Arc<Mutex<ClipboardContext>>,
    tracker: Mutex<ChangeTracker>,
}

impl ClipboardRsClipboard {
    pub fn new() -> Result<Self> {
        let context = ClipboardContext::new()
            .map_err(|e| anyhow!("Failed to create clipboard context: {}", e))?;
        Ok(Self {
            inner: Arc::new(Mutex::new(context)),
            tracker: Mutex::new(ChangeTracker::default()),
        })
    }

    fn context(&self) -> Result<MutexGuard<'_, ClipboardContext>> {
        self.inner
            .lock()
            .map_err(|_| anyhow!("clipboard context lock poisoned"))
    }

    fn tracker(&self) -> MutexGuard<'_, ChangeTracker> {
        self.tracker.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn current_fingerprint(ctx: &ClipboardContext) -> Result<blake3::Hash> {
        if ctx.has(ContentFormat::Text) {
            if let Ok(text) = ctx.get_text() {
                return Ok(text_fingerprint(&text));
            }
        }
        let formats = map_clipboard_err(ctx.available_formats())?;
        Ok(formats_fingerprint(&formats))
    }
}

impl ClipboardPort for ClipboardRsClipboard {
    fn read_change_count(&self) -> Result<i64> {
        let fingerprint = {
            let ctx = self.context()?;
            Self::current_fingerprint(&ctx)?
        };
        let counter = self.tracker().observe(fingerprint);
        trace!(counter, "Read synthetic clipboard change count");
        Ok(counter)
    }

    fn read_text(&self) -> Result<Option<String>> {
        let span = debug_span!("platform.clipboard_rs.read_text");
        span.in_scope(|| {
            let ctx = self.context()?;
            if !ctx.has(ContentFormat::Text) {
                debug!("Clipboard holds no text");
                return Ok(None);
            }
            let text = map_clipboard_err(ctx.get_text())?;
            debug!(len = text.len(), "Read clipboard text");
            Ok(Some(text))
        })
    }

    fn write_text(&self, text: &str) -> Result<i64> {
        let span = debug_span!("platform.clipboard_rs.write_text", len = text.len());
        span.in_scope(|| {
            {
                let ctx = self.context()?;
                map_clipboard_err(ctx.set_text(text.to_string()))?;
            }
            let counter = self.tracker().record_write(text_fingerprint(text));
            debug!(counter, "Wrote clipboard text");
            Ok(counter)
        })
    }
}

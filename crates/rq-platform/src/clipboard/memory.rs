use std::sync::{Mutex, MutexGuard};

use anyhow::{bail, Result};
use rq_core::ports::ClipboardPort;

#[derive(Debug, Default)]
struct MemoryState {
    counter: i64,
    text: Option<String>,
    failing_reads: u32,
    failing_writes: u32,
}

/// In-process clipboard.
///
/// Behaves like a system clipboard with a native change counter. Used for
/// headless runs and tests; failures can be injected to exercise retry paths.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    state: Mutex<MemoryState>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        let clipboard = Self::new();
        clipboard.copy_text(text);
        clipboard
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Simulates another application copying `text`.
    pub fn copy_text(&self, text: impl Into<String>) -> i64 {
        let mut state = self.lock();
        state.counter += 1;
        state.text = Some(text.into());
        state.counter
    }

    /// Simulates another application copying non-text content.
    pub fn copy_non_text(&self) -> i64 {
        let mut state = self.lock();
        state.counter += 1;
        state.text = None;
        state.counter
    }

    pub fn text(&self) -> Option<String> {
        self.lock().text.clone()
    }

    pub fn change_count(&self) -> i64 {
        self.lock().counter
    }

    /// The next `n` text reads fail.
    pub fn fail_next_reads(&self, n: u32) {
        self.lock().failing_reads = n;
    }

    /// The next `n` writes fail.
    pub fn fail_next_writes(&self, n: u32) {
        self.lock().failing_writes = n;
    }
}

impl ClipboardPort for MemoryClipboard {
    fn read_change_count(&self) -> Result<i64> {
        Ok(self.lock().counter)
    }

    fn read_text(&self) -> Result<Option<String>> {
        let mut state = self.lock();
        if state.failing_reads > 0 {
            state.failing_reads -= 1;
            bail!("clipboard busy");
        }
        Ok(state.text.clone())
    }

    fn write_text(&self, text: &str) -> Result<i64> {
        let mut state = self.lock();
        if state.failing_writes > 0 {
            state.failing_writes -= 1;
            bail!("clipboard locked by another process");
        }
        state.counter += 1;
        state.text = Some(text.to_owned());
        Ok(state.counter)
    }
}

//! Clipboard observer port
//!
//! Views that care about clipboard activity (history list, rule editor,
//! primary view) implement this trait and subscribe to the observer hub.
//! Every observer receives every event; there are no optional callbacks.

use crate::event::ClipboardEvent;

/// Receiver of clipboard events.
///
/// Implementations are called synchronously from the watcher tick and must
/// return quickly.
pub trait ClipboardObserver: Send + Sync {
    fn on_event(&self, event: &ClipboardEvent);
}

impl<F> ClipboardObserver for F
where
    F: Fn(&ClipboardEvent) + Send + Sync,
{
    fn on_event(&self, event: &ClipboardEvent) {
        self(event)
    }
}

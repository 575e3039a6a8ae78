//! In-memory clipboard history.
//!
//! [`ClipboardHistory`] is an ordinary observer: subscribe it to the hub and
//! it records every `ContentChanged` event, newest first, up to a fixed
//! capacity. `RuleApplied` events only bump the per-item rule counter.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rq_core::ports::ClipboardObserver;
use rq_core::ClipboardEvent;

pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryItem {
    pub captured_at: DateTime<Utc>,
    pub original: String,
    pub final_text: String,
    pub rules_applied: usize,
}

impl HistoryItem {
    pub fn was_replaced(&self) -> bool {
        self.original != self.final_text
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryStats {
    /// Items currently held.
    pub total: usize,
    /// Items whose text was rewritten.
    pub replaced: usize,
}

pub struct ClipboardHistory {
    capacity: usize,
    items: Mutex<VecDeque<HistoryItem>>,
}

impl ClipboardHistory {
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            items: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Newest first.
    pub fn items(&self) -> Vec<HistoryItem> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn stats(&self) -> HistoryStats {
        let items = self.lock();
        HistoryStats {
            total: items.len(),
            replaced: items.iter().filter(|item| item.was_replaced()).count(),
        }
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<HistoryItem>> {
        self.items.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for ClipboardHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl ClipboardObserver for ClipboardHistory {
    fn on_event(&self, event: &ClipboardEvent) {
        match event {
            ClipboardEvent::ContentChanged {
                original,
                final_text,
            } => {
                let mut items = self.lock();
                if items.len() == self.capacity {
                    items.pop_back();
                }
                items.push_front(HistoryItem {
                    captured_at: Utc::now(),
                    original: original.clone(),
                    final_text: final_text.clone(),
                    rules_applied: 0,
                });
            }
            // The watcher publishes ContentChanged before the RuleApplied
            // events of the same tick.
            ClipboardEvent::RuleApplied {
                original,
                final_text,
                ..
            } => {
                let mut items = self.lock();
                if let Some(latest) = items.front_mut() {
                    if &latest.original == original && &latest.final_text == final_text {
                        latest.rules_applied += 1;
                    }
                }
            }
            ClipboardEvent::MonitoringChanged { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rq_core::Rule;

    fn changed(original: &str, final_text: &str) -> ClipboardEvent {
        ClipboardEvent::ContentChanged {
            original: original.into(),
            final_text: final_text.into(),
        }
    }

    #[test]
    fn records_newest_first() {
        let history = ClipboardHistory::new(10);
        history.on_event(&changed("one", "one"));
        history.on_event(&changed("two", "2"));

        let items = history.items();
        assert_eq!(items[0].original, "two");
        assert_eq!(items[1].original, "one");
    }

    #[test]
    fn drops_oldest_beyond_capacity() {
        let history = ClipboardHistory::new(2);
        for text in ["a", "b", "c"] {
            history.on_event(&changed(text, text));
        }

        let originals: Vec<_> = history.items().into_iter().map(|i| i.original).collect();
        assert_eq!(originals, ["c", "b"]);
    }

    #[test]
    fn counts_rules_applied_to_latest_item() {
        let history = ClipboardHistory::default();
        let rule = Rule::new("teh", "the").unwrap();
        history.on_event(&changed("teh", "the"));
        history.on_event(&ClipboardEvent::RuleApplied {
            original: "teh".into(),
            final_text: "the".into(),
            rule,
        });

        assert_eq!(history.items()[0].rules_applied, 1);
    }

    #[test]
    fn stats_count_replacements() {
        let history = ClipboardHistory::default();
        history.on_event(&changed("same", "same"));
        history.on_event(&changed("teh", "the"));

        assert_eq!(
            history.stats(),
            HistoryStats {
                total: 2,
                replaced: 1
            }
        );
    }

    #[test]
    fn clear_empties_history() {
        let history = ClipboardHistory::default();
        history.on_event(&changed("a", "a"));
        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn monitoring_events_are_not_recorded() {
        let history = ClipboardHistory::default();
        history.on_event(&ClipboardEvent::MonitoringChanged { enabled: true });
        assert_eq!(history.len(), 0);
    }

    #[test]
    fn zero_capacity_is_raised() {
        assert_eq!(ClipboardHistory::new(0).capacity(), 1);
    }
}

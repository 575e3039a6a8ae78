//! Observer hub
//!
//! Thread-safe registry that fans clipboard events out to every subscribed
//! observer.
//!
//! ## Delivery guarantees
//!
//! - Each broadcast iterates a snapshot of the registry taken when the
//!   broadcast starts. Subscribing or unsubscribing during a broadcast only
//!   affects later broadcasts.
//! - A panicking observer is caught and logged; remaining observers still
//!   receive the event.
//! - Broadcasts are serialized, so one observer never sees two events
//!   interleaved.
//!
//! An observer may publish from inside a callback (stopping the watcher
//! publishes `MonitoringChanged`, for example). Such nested events are queued
//! and delivered right after the batch in progress.

use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::thread::{self, ThreadId};

use rq_core::ports::ClipboardObserver;
use rq_core::{ClipboardEvent, Rule};
use tracing::{trace, warn};

/// Handle returned by [`ObserverHub::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

type Entry = (SubscriptionId, Arc<dyn ClipboardObserver>);

#[derive(Default)]
struct DeliveryState {
    /// Thread currently running a broadcast.
    owner: Option<ThreadId>,
    /// Events published by observers during that broadcast.
    pending: VecDeque<ClipboardEvent>,
}

#[derive(Default)]
pub struct ObserverHub {
    observers: RwLock<Vec<Entry>>,
    next_id: AtomicU64,
    delivery: Mutex<()>,
    state: Mutex<DeliveryState>,
}

impl ObserverHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, observer: Arc<dyn ClipboardObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.observers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push((id, observer));
        trace!(subscription = %id, "Observer subscribed");
        id
    }

    /// Returns `false` when `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.observers.write().unwrap_or_else(|e| e.into_inner());
        let before = observers.len();
        observers.retain(|(entry_id, _)| *entry_id != id);
        let removed = observers.len() != before;
        if removed {
            trace!(subscription = %id, "Observer unsubscribed");
        }
        removed
    }

    pub fn observer_count(&self) -> usize {
        self.observers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    /// Drops every subscription.
    pub fn clear(&self) {
        self.observers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    pub fn notify_content_changed(&self, original: &str, final_text: &str) {
        self.publish(&[ClipboardEvent::ContentChanged {
            original: original.to_owned(),
            final_text: final_text.to_owned(),
        }]);
    }

    pub fn notify_rule_applied(&self, original: &str, final_text: &str, rule: &Rule) {
        self.publish(&[ClipboardEvent::RuleApplied {
            original: original.to_owned(),
            final_text: final_text.to_owned(),
            rule: rule.clone(),
        }]);
    }

    pub fn notify_monitoring_changed(&self, enabled: bool) {
        self.publish(&[ClipboardEvent::MonitoringChanged { enabled }]);
    }

    /// Delivers `events` in order to every observer subscribed at call time.
    pub fn publish(&self, events: &[ClipboardEvent]) {
        if events.is_empty() {
            return;
        }

        let me = thread::current().id();
        {
            let mut state = self.lock_state();
            if state.owner == Some(me) {
                state.pending.extend(events.iter().cloned());
                return;
            }
        }

        let _delivery = self.delivery.lock().unwrap_or_else(|e| e.into_inner());
        self.lock_state().owner = Some(me);

        self.deliver(events);
        loop {
            let nested: Vec<ClipboardEvent> = self.lock_state().pending.drain(..).collect();
            if nested.is_empty() {
                break;
            }
            self.deliver(&nested);
        }

        self.lock_state().owner = None;
    }

    fn deliver(&self, events: &[ClipboardEvent]) {
        let snapshot: Vec<Entry> = self
            .observers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();

        for event in events {
            for (id, observer) in &snapshot {
                let delivered = catch_unwind(AssertUnwindSafe(|| observer.on_event(event)));
                if delivered.is_err() {
                    warn!(subscription = %id, event = event.kind(), "Observer panicked during delivery");
                }
            }
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, DeliveryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl std::fmt::Debug for ObserverHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverHub")
            .field("observers", &self.observer_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<ClipboardEvent>>,
    }

    impl Recorder {
        fn events(&self) -> Vec<ClipboardEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    impl ClipboardObserver for Recorder {
        fn on_event(&self, event: &ClipboardEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    fn changed(original: &str, final_text: &str) -> ClipboardEvent {
        ClipboardEvent::ContentChanged {
            original: original.into(),
            final_text: final_text.into(),
        }
    }

    #[test]
    fn every_subscriber_receives_each_event_once() {
        let hub = ObserverHub::new();
        let a = Arc::new(Recorder::default());
        let b = Arc::new(Recorder::default());
        hub.subscribe(a.clone());
        hub.subscribe(b.clone());

        hub.notify_content_changed("x", "y");

        assert_eq!(a.events(), vec![changed("x", "y")]);
        assert_eq!(b.events(), vec![changed("x", "y")]);
    }

    #[test]
    fn unsubscribed_observer_stops_receiving() {
        let hub = ObserverHub::new();
        let a = Arc::new(Recorder::default());
        let id = hub.subscribe(a.clone());

        assert!(hub.unsubscribe(id));
        assert!(!hub.unsubscribe(id));
        hub.notify_monitoring_changed(true);

        assert!(a.events().is_empty());
        assert_eq!(hub.observer_count(), 0);
    }

    #[test]
    fn removal_during_broadcast_still_delivers_to_others() {
        let hub = Arc::new(ObserverHub::new());
        let y = Arc::new(Recorder::default());
        let x_id = Arc::new(Mutex::new(None::<SubscriptionId>));

        let hub_for_x = Arc::downgrade(&hub);
        let id_for_x = x_id.clone();
        let x = move |_: &ClipboardEvent| {
            if let (Some(hub), Some(id)) = (hub_for_x.upgrade(), *id_for_x.lock().unwrap()) {
                hub.unsubscribe(id);
            }
        };
        *x_id.lock().unwrap() = Some(hub.subscribe(Arc::new(x)));
        hub.subscribe(y.clone());

        hub.notify_content_changed("a", "b");

        assert_eq!(y.events(), vec![changed("a", "b")]);
        assert_eq!(hub.observer_count(), 1);
    }

    #[test]
    fn removing_a_later_observer_mid_broadcast_does_not_skip_it() {
        let hub = Arc::new(ObserverHub::new());
        let y = Arc::new(Recorder::default());
        let y_id = Arc::new(Mutex::new(None::<SubscriptionId>));

        let hub_for_x = Arc::downgrade(&hub);
        let target = y_id.clone();
        hub.subscribe(Arc::new(move |_: &ClipboardEvent| {
            if let (Some(hub), Some(id)) = (hub_for_x.upgrade(), *target.lock().unwrap()) {
                hub.unsubscribe(id);
            }
        }));
        *y_id.lock().unwrap() = Some(hub.subscribe(y.clone()));

        hub.notify_content_changed("a", "b");
        hub.notify_content_changed("c", "d");

        assert_eq!(y.events(), vec![changed("a", "b")]);
    }

    #[test]
    fn panicking_observer_does_not_block_others() {
        let hub = ObserverHub::new();
        hub.subscribe(Arc::new(|_: &ClipboardEvent| panic!("observer failure")));
        let y = Arc::new(Recorder::default());
        hub.subscribe(y.clone());

        hub.notify_content_changed("a", "b");

        assert_eq!(y.events(), vec![changed("a", "b")]);
    }

    #[test]
    fn publish_delivers_batch_in_order() {
        let hub = ObserverHub::new();
        let a = Arc::new(Recorder::default());
        hub.subscribe(a.clone());
        let rule = Rule::new("teh", "the").unwrap();

        hub.publish(&[
            changed("teh", "the"),
            ClipboardEvent::RuleApplied {
                original: "teh".into(),
                final_text: "the".into(),
                rule: rule.clone(),
            },
        ]);

        let events = a.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind(), "content_changed");
        assert_eq!(events[1].kind(), "rule_applied");
    }

    #[test]
    fn nested_publish_is_delivered_after_current_batch() {
        let hub = Arc::new(ObserverHub::new());
        let weak = Arc::downgrade(&hub);
        hub.subscribe(Arc::new(move |event: &ClipboardEvent| {
            if let ClipboardEvent::ContentChanged { .. } = event {
                if let Some(hub) = weak.upgrade() {
                    hub.notify_monitoring_changed(false);
                }
            }
        }));
        let y = Arc::new(Recorder::default());
        hub.subscribe(y.clone());

        hub.notify_content_changed("a", "b");

        assert_eq!(
            y.events(),
            vec![
                changed("a", "b"),
                ClipboardEvent::MonitoringChanged { enabled: false }
            ]
        );
    }

    #[test]
    fn concurrent_subscribers_are_all_notified() {
        let hub = Arc::new(ObserverHub::new());
        let count = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let hub = hub.clone();
                let count = count.clone();
                std::thread::spawn(move || {
                    hub.subscribe(Arc::new(move |_: &ClipboardEvent| {
                        count.fetch_add(1, Ordering::SeqCst);
                    }));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        hub.notify_monitoring_changed(false);

        assert_eq!(count.load(Ordering::SeqCst), 8);
    }
}

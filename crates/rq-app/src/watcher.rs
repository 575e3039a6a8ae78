//! Clipboard watcher
//!
//! Bridges the pure rule engine to the live system clipboard.
//!
//! ```text
//! interval tick
//!      ↓
//! ClipboardPort::read_change_count
//!      ↓  (changed, not our own write)
//! ClipboardPort::read_text → engine::apply → ClipboardPort::write_text
//!      ↓
//! ObserverHub::publish
//! ```
//!
//! ## Change Detection
//!
//! The platform clipboard exposes a change counter bumped by every process
//! that replaces its content. A tick is an external change only when the
//! counter differs from both the value seen on the previous tick and the
//! value produced by the watcher's own last write. After a rewrite the new
//! counter is recorded as both, so the watcher never reacts to itself.
//!
//! Two external writes landing between ticks with the second one colliding
//! with the own-write counter would be taken for a self-write. Polling cannot
//! rule this out.
//!
//! ## Failures
//!
//! Reading or writing the clipboard can fail transiently (another process
//! holding it, for example). Such a tick is skipped without touching the
//! detection state, so the same change is retried on the next tick. Nothing
//! is reported to observers.
//!
//! ## Lifecycle
//!
//! `start()` spawns one polling task on the current tokio runtime and
//! `stop()` cancels it. Both are idempotent. `stop()` never waits for the
//! task, so it may be called from inside an observer callback; the loop
//! checks cancellation before every tick, so no tick begins after `stop()`
//! returns.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use rq_core::ports::{ClipboardPort, WatcherControlError, WatcherControlPort};
use rq_core::{engine, AppConfig, ClipboardEvent};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::hub::ObserverHub;
use crate::rules::RuleBook;

/// Polling configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatcherConfig {
    pub poll_interval: Duration,
}

impl WatcherConfig {
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(300);
    pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(50);
    pub const MAX_POLL_INTERVAL: Duration = Duration::from_millis(5_000);

    /// Builds a config with `poll_interval` clamped to the supported range.
    pub fn with_poll_interval(poll_interval: Duration) -> Self {
        Self {
            poll_interval: poll_interval.clamp(Self::MIN_POLL_INTERVAL, Self::MAX_POLL_INTERVAL),
        }
    }

    pub fn from_app_config(config: &AppConfig) -> Self {
        config
            .poll_interval_ms
            .map(|ms| Self::with_poll_interval(Duration::from_millis(ms)))
            .unwrap_or_default()
    }
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Which clipboard call failed during a skipped tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    ReadCounter,
    ReadText,
    WriteText,
}

/// What a single tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Counter unchanged since the previous tick.
    Unchanged,
    /// The change was the watcher's own write.
    SelfWrite { counter: i64 },
    /// External change without a text representation.
    NonText { counter: i64 },
    /// External change left as-is.
    Observed { counter: i64 },
    /// External change rewritten; `counter` is the one produced by our write.
    Rewritten { counter: i64, fired: usize },
    /// A clipboard call failed; the change will be retried.
    Skipped(SkipReason),
}

#[derive(Debug, Default)]
struct PollState {
    last_seen: Option<i64>,
    last_own_write: Option<i64>,
    /// Set when priming could not read the counter; the first successful
    /// read then only primes.
    prime_pending: bool,
}

struct WatcherCore {
    clipboard: Arc<dyn ClipboardPort>,
    rules: RuleBook,
    hub: Arc<ObserverHub>,
    state: Mutex<PollState>,
}

impl WatcherCore {
    fn lock_state(&self) -> MutexGuard<'_, PollState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Records the current counter so content already present is left alone.
    fn prime(&self) {
        let mut state = self.lock_state();
        match self.clipboard.read_change_count() {
            Ok(counter) => {
                state.last_seen = Some(counter);
                state.prime_pending = false;
                debug!(counter, "Clipboard watcher primed");
            }
            Err(e) => {
                state.prime_pending = true;
                debug!(error = %e, "Could not prime clipboard counter, priming on first tick");
            }
        }
    }

    fn poll_once(&self) -> PollOutcome {
        let mut state = self.lock_state();

        let counter = match self.clipboard.read_change_count() {
            Ok(counter) => counter,
            Err(e) => {
                debug!(error = %e, "Failed to read clipboard change counter, retrying next tick");
                return PollOutcome::Skipped(SkipReason::ReadCounter);
            }
        };

        if state.prime_pending {
            state.prime_pending = false;
            state.last_seen = Some(counter);
            debug!(counter, "Clipboard watcher primed on first tick");
            return PollOutcome::Unchanged;
        }

        if state.last_seen == Some(counter) {
            trace!(counter, "Clipboard unchanged");
            return PollOutcome::Unchanged;
        }

        if state.last_own_write == Some(counter) {
            state.last_seen = Some(counter);
            trace!(counter, "Ignoring own clipboard write");
            return PollOutcome::SelfWrite { counter };
        }

        let original = match self.clipboard.read_text() {
            Ok(Some(text)) => text,
            Ok(None) => {
                state.last_seen = Some(counter);
                debug!(counter, "Clipboard changed to non-text content");
                return PollOutcome::NonText { counter };
            }
            Err(e) => {
                warn!(error = %e, "Failed to read clipboard text, retrying next tick");
                return PollOutcome::Skipped(SkipReason::ReadText);
            }
        };

        let rules = self.rules.snapshot();
        let outcome = engine::apply(&rules, &original);

        let (events, result) = if outcome.rewrote(&original) {
            let written = match self.clipboard.write_text(&outcome.output) {
                Ok(written) => written,
                Err(e) => {
                    warn!(error = %e, "Failed to write rewritten clipboard text, retrying next tick");
                    return PollOutcome::Skipped(SkipReason::WriteText);
                }
            };
            state.last_own_write = Some(written);
            state.last_seen = Some(written);

            info!(
                counter,
                written,
                fired = outcome.fired.len(),
                original_len = original.len(),
                final_len = outcome.output.len(),
                "Clipboard text rewritten"
            );

            let mut events = Vec::with_capacity(outcome.fired.len() + 1);
            events.push(ClipboardEvent::ContentChanged {
                original: original.clone(),
                final_text: outcome.output.clone(),
            });
            events.extend(outcome.fired.iter().map(|rule| ClipboardEvent::RuleApplied {
                original: original.clone(),
                final_text: outcome.output.clone(),
                rule: rule.clone(),
            }));
            let fired = outcome.fired.len();
            (
                events,
                PollOutcome::Rewritten {
                    counter: written,
                    fired,
                },
            )
        } else {
            state.last_seen = Some(counter);
            debug!(counter, len = original.len(), "Clipboard changed, no rule applied");
            (
                vec![ClipboardEvent::ContentChanged {
                    final_text: original.clone(),
                    original,
                }],
                PollOutcome::Observed { counter },
            )
        };

        // Observers run without the detection state locked.
        drop(state);
        self.hub.publish(&events);
        result
    }
}

struct RunningTask {
    token: CancellationToken,
    // Detached on stop; kept so the task is owned while running.
    _handle: JoinHandle<()>,
}

/// Polls the system clipboard and rewrites it with the current rules.
pub struct ClipboardWatcher {
    core: Arc<WatcherCore>,
    config: WatcherConfig,
    task: Mutex<Option<RunningTask>>,
}

impl ClipboardWatcher {
    pub fn new(
        clipboard: Arc<dyn ClipboardPort>,
        rules: RuleBook,
        hub: Arc<ObserverHub>,
        config: WatcherConfig,
    ) -> Self {
        Self {
            core: Arc::new(WatcherCore {
                clipboard,
                rules,
                hub,
                state: Mutex::new(PollState::default()),
            }),
            config,
            task: Mutex::new(None),
        }
    }

    pub fn config(&self) -> WatcherConfig {
        self.config
    }

    pub fn rules(&self) -> &RuleBook {
        &self.core.rules
    }

    pub fn hub(&self) -> &Arc<ObserverHub> {
        &self.core.hub
    }

    fn lock_task(&self) -> MutexGuard<'_, Option<RunningTask>> {
        self.task.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_running(&self) -> bool {
        self.lock_task()
            .as_ref()
            .is_some_and(|task| !task.token.is_cancelled())
    }

    /// Starts polling on the current tokio runtime.
    ///
    /// Calling this while already running is a no-op.
    ///
    /// # Errors
    ///
    /// [`WatcherControlError::StartFailed`] when called outside a tokio runtime.
    pub fn start(&self) -> Result<(), WatcherControlError> {
        {
            let mut task = self.lock_task();
            if task.as_ref().is_some_and(|t| !t.token.is_cancelled()) {
                debug!("Clipboard watcher already running, skipping start");
                return Ok(());
            }

            let runtime =
                Handle::try_current().map_err(|e| WatcherControlError::StartFailed(e.to_string()))?;
            // Primed before spawning so a copy made right after `start`
            // returns is still seen as a change.
            self.core.prime();
            let token = CancellationToken::new();
            let handle = runtime.spawn(run_loop(
                self.core.clone(),
                self.config.poll_interval,
                token.clone(),
            ));
            *task = Some(RunningTask {
                token,
                _handle: handle,
            });
        }

        info!(
            poll_interval_ms = self.config.poll_interval.as_millis() as u64,
            "Clipboard watcher started"
        );
        self.core.hub.notify_monitoring_changed(true);
        Ok(())
    }

    /// Stops polling. Calling this while stopped is a no-op.
    pub fn stop(&self) {
        let Some(task) = self.lock_task().take() else {
            debug!("Clipboard watcher already stopped");
            return;
        };
        task.token.cancel();

        info!("Clipboard watcher stopped");
        self.core.hub.notify_monitoring_changed(false);
    }

    /// Flips monitoring and returns the new state.
    pub fn toggle(&self) -> Result<bool, WatcherControlError> {
        if self.is_running() {
            self.stop();
            Ok(false)
        } else {
            self.start()?;
            Ok(true)
        }
    }

    /// Runs one detection tick immediately.
    ///
    /// The polling task calls this on every interval. Must not be called from
    /// inside an observer callback.
    pub fn poll_once(&self) -> PollOutcome {
        self.core.poll_once()
    }

    /// Stops polling and releases every subscriber.
    pub fn shutdown(&self) {
        self.stop();
        self.core.hub.clear();
    }
}

impl Drop for ClipboardWatcher {
    fn drop(&mut self) {
        if let Some(task) = self.lock_task().take() {
            task.token.cancel();
        }
    }
}

async fn run_loop(core: Arc<WatcherCore>, poll_interval: Duration, token: CancellationToken) {
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                if token.is_cancelled() {
                    break;
                }
                core.poll_once();
            }
        }
    }

    debug!("Clipboard poll loop exited");
}

#[async_trait]
impl WatcherControlPort for ClipboardWatcher {
    async fn start_watcher(&self) -> Result<(), WatcherControlError> {
        self.start()
    }

    async fn stop_watcher(&self) -> Result<(), WatcherControlError> {
        self.stop();
        Ok(())
    }

    fn is_watching(&self) -> bool {
        self.is_running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use rq_core::Rule;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Clipboard fake with a counter that bumps on every replacement.
    #[derive(Default)]
    struct FakeClipboard {
        inner: Mutex<FakeState>,
        fail_write: AtomicBool,
        fail_counter: AtomicBool,
        text_reads: AtomicUsize,
    }

    #[derive(Default)]
    struct FakeState {
        counter: i64,
        text: Option<String>,
    }

    impl FakeClipboard {
        fn external_write(&self, text: Option<&str>) -> i64 {
            let mut state = self.inner.lock().unwrap();
            state.counter += 1;
            state.text = text.map(str::to_owned);
            state.counter
        }

        fn text(&self) -> Option<String> {
            self.inner.lock().unwrap().text.clone()
        }

        fn counter(&self) -> i64 {
            self.inner.lock().unwrap().counter
        }
    }

    impl ClipboardPort for FakeClipboard {
        fn read_change_count(&self) -> Result<i64> {
            if self.fail_counter.load(Ordering::SeqCst) {
                return Err(anyhow!("counter unavailable"));
            }
            Ok(self.inner.lock().unwrap().counter)
        }

        fn read_text(&self) -> Result<Option<String>> {
            self.text_reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.inner.lock().unwrap().text.clone())
        }

        fn write_text(&self, text: &str) -> Result<i64> {
            if self.fail_write.load(Ordering::SeqCst) {
                return Err(anyhow!("clipboard locked"));
            }
            Ok(self.external_write(Some(text)))
        }
    }

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<ClipboardEvent>>,
    }

    impl Recorder {
        fn events(&self) -> Vec<ClipboardEvent> {
            self.events.lock().unwrap().clone()
        }

        fn count(&self, kind: &str) -> usize {
            self.events().iter().filter(|e| e.kind() == kind).count()
        }
    }

    impl rq_core::ports::ClipboardObserver for Recorder {
        fn on_event(&self, event: &ClipboardEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    fn setup(rules: Vec<Rule>) -> (Arc<FakeClipboard>, Arc<Recorder>, ClipboardWatcher) {
        let clipboard = Arc::new(FakeClipboard::default());
        let hub = Arc::new(ObserverHub::new());
        let recorder = Arc::new(Recorder::default());
        hub.subscribe(recorder.clone());
        let watcher = ClipboardWatcher::new(
            clipboard.clone(),
            RuleBook::new(rules),
            hub,
            WatcherConfig::default(),
        );
        (clipboard, recorder, watcher)
    }

    fn teh() -> Rule {
        Rule::new("teh", "the").unwrap()
    }

    #[test]
    fn config_clamps_interval() {
        assert_eq!(
            WatcherConfig::with_poll_interval(Duration::ZERO).poll_interval,
            WatcherConfig::MIN_POLL_INTERVAL
        );
        assert_eq!(
            WatcherConfig::with_poll_interval(Duration::from_secs(60)).poll_interval,
            WatcherConfig::MAX_POLL_INTERVAL
        );
    }

    #[test]
    fn config_defaults_when_interval_missing() {
        assert_eq!(
            WatcherConfig::from_app_config(&AppConfig::empty()),
            WatcherConfig::default()
        );
        let config = AppConfig {
            poll_interval_ms: Some(250),
            ..AppConfig::empty()
        };
        assert_eq!(
            WatcherConfig::from_app_config(&config).poll_interval,
            Duration::from_millis(250)
        );
    }

    #[test]
    fn rewrites_external_change_and_notifies_once() {
        let (clipboard, recorder, watcher) = setup(vec![teh()]);
        clipboard.external_write(Some("I teh cat"));

        let outcome = watcher.poll_once();

        assert_eq!(
            outcome,
            PollOutcome::Rewritten {
                counter: clipboard.counter(),
                fired: 1
            }
        );
        assert_eq!(clipboard.text().as_deref(), Some("I the cat"));
        assert_eq!(
            recorder.events(),
            vec![
                ClipboardEvent::ContentChanged {
                    original: "I teh cat".into(),
                    final_text: "I the cat".into(),
                },
                ClipboardEvent::RuleApplied {
                    original: "I teh cat".into(),
                    final_text: "I the cat".into(),
                    rule: teh(),
                },
            ]
        );
    }

    #[test]
    fn own_write_is_not_reprocessed() {
        let (clipboard, recorder, watcher) = setup(vec![teh()]);
        clipboard.external_write(Some("teh"));
        watcher.poll_once();
        let reads = clipboard.text_reads.load(Ordering::SeqCst);

        assert_eq!(watcher.poll_once(), PollOutcome::Unchanged);
        assert_eq!(watcher.poll_once(), PollOutcome::Unchanged);

        assert_eq!(clipboard.text_reads.load(Ordering::SeqCst), reads);
        assert_eq!(recorder.count("content_changed"), 1);
    }

    #[test]
    fn own_write_counter_is_skipped_when_last_seen_lags() {
        let (clipboard, recorder, watcher) = setup(vec![teh()]);
        clipboard.external_write(Some("teh"));
        watcher.poll_once();
        let own = clipboard.counter();
        // Simulate the detection state lagging behind our own write.
        watcher.core.lock_state().last_seen = Some(own - 1);

        assert_eq!(watcher.poll_once(), PollOutcome::SelfWrite { counter: own });
        assert_eq!(recorder.count("content_changed"), 1);
        assert_eq!(watcher.poll_once(), PollOutcome::Unchanged);
    }

    #[test]
    fn unmatched_change_emits_content_changed_only() {
        let (clipboard, recorder, watcher) = setup(vec![teh()]);
        let counter = clipboard.external_write(Some("hello"));

        assert_eq!(watcher.poll_once(), PollOutcome::Observed { counter });
        assert_eq!(clipboard.counter(), counter, "no write-back expected");
        assert_eq!(
            recorder.events(),
            vec![ClipboardEvent::ContentChanged {
                original: "hello".into(),
                final_text: "hello".into(),
            }]
        );
    }

    #[test]
    fn every_external_change_is_reported() {
        let (clipboard, recorder, watcher) = setup(vec![]);
        clipboard.external_write(Some("one"));
        watcher.poll_once();
        clipboard.external_write(Some("one"));
        watcher.poll_once();

        assert_eq!(recorder.count("content_changed"), 2);
    }

    #[test]
    fn non_text_content_is_tracked_but_ignored() {
        let (clipboard, recorder, watcher) = setup(vec![teh()]);
        let counter = clipboard.external_write(None);

        assert_eq!(watcher.poll_once(), PollOutcome::NonText { counter });
        assert_eq!(watcher.poll_once(), PollOutcome::Unchanged);
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn failed_write_is_retried_next_tick() {
        let (clipboard, recorder, watcher) = setup(vec![teh()]);
        clipboard.external_write(Some("teh"));
        clipboard.fail_write.store(true, Ordering::SeqCst);

        assert_eq!(
            watcher.poll_once(),
            PollOutcome::Skipped(SkipReason::WriteText)
        );
        assert!(recorder.events().is_empty());

        clipboard.fail_write.store(false, Ordering::SeqCst);
        assert!(matches!(
            watcher.poll_once(),
            PollOutcome::Rewritten { fired: 1, .. }
        ));
        assert_eq!(clipboard.text().as_deref(), Some("the"));
        assert_eq!(recorder.count("content_changed"), 1);
    }

    #[test]
    fn unreadable_counter_skips_tick() {
        let (clipboard, recorder, watcher) = setup(vec![teh()]);
        clipboard.external_write(Some("teh"));
        clipboard.fail_counter.store(true, Ordering::SeqCst);

        assert_eq!(
            watcher.poll_once(),
            PollOutcome::Skipped(SkipReason::ReadCounter)
        );
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn rule_edits_apply_on_next_tick() {
        let (clipboard, _recorder, watcher) = setup(vec![]);
        watcher.rules().push(teh());
        clipboard.external_write(Some("teh"));

        watcher.poll_once();

        assert_eq!(clipboard.text().as_deref(), Some("the"));
    }

    #[test]
    fn start_outside_runtime_fails() {
        let (_clipboard, _recorder, watcher) = setup(vec![]);
        assert!(matches!(
            watcher.start(),
            Err(WatcherControlError::StartFailed(_))
        ));
        assert!(!watcher.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn start_and_stop_are_idempotent() {
        let (_clipboard, recorder, watcher) = setup(vec![]);

        watcher.start().unwrap();
        watcher.start().unwrap();
        assert!(watcher.is_running());

        watcher.stop();
        watcher.stop();
        assert!(!watcher.is_running());

        assert_eq!(
            recorder.events(),
            vec![
                ClipboardEvent::MonitoringChanged { enabled: true },
                ClipboardEvent::MonitoringChanged { enabled: false },
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn polling_loop_rewrites_changes_made_after_start() {
        let (clipboard, recorder, watcher) = setup(vec![teh()]);
        clipboard.external_write(Some("teh before start"));

        watcher.start().unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        clipboard.external_write(Some("teh after start"));
        tokio::time::sleep(WatcherConfig::DEFAULT_POLL_INTERVAL * 3).await;

        assert_eq!(clipboard.text().as_deref(), Some("the after start"));
        assert_eq!(recorder.count("content_changed"), 1);
        assert_eq!(recorder.count("rule_applied"), 1);
        watcher.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn copy_right_after_start_is_rewritten() {
        let (clipboard, recorder, watcher) = setup(vec![teh()]);

        watcher.start().unwrap();
        clipboard.external_write(Some("I teh cat"));
        tokio::time::sleep(WatcherConfig::DEFAULT_POLL_INTERVAL * 3).await;

        assert_eq!(clipboard.text().as_deref(), Some("I the cat"));
        assert_eq!(recorder.count("rule_applied"), 1);
        watcher.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn failed_prime_leaves_existing_content_alone() {
        let (clipboard, recorder, watcher) = setup(vec![teh()]);
        clipboard.external_write(Some("teh before start"));
        clipboard.fail_counter.store(true, Ordering::SeqCst);

        watcher.start().unwrap();
        clipboard.fail_counter.store(false, Ordering::SeqCst);
        tokio::time::sleep(WatcherConfig::DEFAULT_POLL_INTERVAL * 3).await;

        assert_eq!(clipboard.text().as_deref(), Some("teh before start"));
        assert_eq!(recorder.count("content_changed"), 0);

        clipboard.external_write(Some("teh after"));
        tokio::time::sleep(WatcherConfig::DEFAULT_POLL_INTERVAL * 3).await;

        assert_eq!(clipboard.text().as_deref(), Some("the after"));
        watcher.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn no_poll_happens_after_stop() {
        let (clipboard, recorder, watcher) = setup(vec![teh()]);
        watcher.start().unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        watcher.stop();
        clipboard.external_write(Some("teh"));
        tokio::time::sleep(WatcherConfig::DEFAULT_POLL_INTERVAL * 5).await;

        assert_eq!(clipboard.text().as_deref(), Some("teh"));
        assert_eq!(recorder.count("content_changed"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_flips_state() {
        let (_clipboard, _recorder, watcher) = setup(vec![]);
        assert!(watcher.toggle().unwrap());
        assert!(watcher.is_running());
        assert!(!watcher.toggle().unwrap());
        assert!(!watcher.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_from_inside_observer_callback() {
        let clipboard = Arc::new(FakeClipboard::default());
        let hub = Arc::new(ObserverHub::new());
        let watcher = Arc::new(ClipboardWatcher::new(
            clipboard.clone(),
            RuleBook::new(vec![teh()]),
            hub.clone(),
            WatcherConfig::default(),
        ));

        let weak = Arc::downgrade(&watcher);
        let changes = Arc::new(AtomicUsize::new(0));
        let seen = changes.clone();
        hub.subscribe(Arc::new(move |event: &ClipboardEvent| {
            if let ClipboardEvent::ContentChanged { .. } = event {
                seen.fetch_add(1, Ordering::SeqCst);
                if let Some(watcher) = weak.upgrade() {
                    watcher.stop();
                }
            }
        }));

        watcher.start().unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        clipboard.external_write(Some("teh"));
        tokio::time::sleep(WatcherConfig::DEFAULT_POLL_INTERVAL * 2).await;
        assert!(!watcher.is_running());

        clipboard.external_write(Some("teh again"));
        tokio::time::sleep(WatcherConfig::DEFAULT_POLL_INTERVAL * 5).await;

        assert_eq!(changes.load(Ordering::SeqCst), 1);
        assert_eq!(clipboard.text().as_deref(), Some("teh again"));
    }

    #[tokio::test(start_paused = true)]
    async fn watcher_control_port_drives_lifecycle() {
        let (_clipboard, _recorder, watcher) = setup(vec![]);
        let port: &dyn WatcherControlPort = &watcher;

        port.start_watcher().await.unwrap();
        assert!(port.is_watching());
        port.stop_watcher().await.unwrap();
        assert!(!port.is_watching());
    }
}

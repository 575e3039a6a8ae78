//! Use case for flipping clipboard monitoring on or off
//! 切换剪贴板监控状态的用例

use std::sync::Arc;

use rq_core::ports::{WatcherControlError, WatcherControlPort};
use tracing::{info, info_span, Instrument};

pub struct ToggleMonitoring {
    watcher_control: Arc<dyn WatcherControlPort>,
}

impl ToggleMonitoring {
    pub fn new(watcher_control: Arc<dyn WatcherControlPort>) -> Self {
        Self { watcher_control }
    }

    /// Execute the use case.
    ///
    /// # Returns / 返回值
    /// - `Ok(true)` when monitoring is now on, `Ok(false)` when it is now off
    pub async fn execute(&self) -> Result<bool, WatcherControlError> {
        let span = info_span!("usecase.toggle_monitoring.execute");

        async {
            let enable = !self.watcher_control.is_watching();
            if enable {
                self.watcher_control.start_watcher().await?;
            } else {
                self.watcher_control.stop_watcher().await?;
            }
            info!(enabled = enable, "Clipboard monitoring toggled");
            Ok(enable)
        }
        .instrument(span)
        .await
    }
}

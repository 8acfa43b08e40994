// statusbot-core/src/tasks/status_refresh.rs

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::services::status_service::{RefreshTrigger, StatusService};

/// Spawns a background task that refreshes the status message once per
/// `period`, starting one period from now. Failures are already logged by the
/// service; the loop simply waits for the next tick.
pub fn spawn_status_refresh_task(service: Arc<StatusService>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Status refresh task started (every {:?})", period);

        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if let Err(e) = service.run_cycle(RefreshTrigger::Timer).await {
                debug!("Timer refresh skipped until next tick: {e}");
            }
        }
    })
}

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{error, info};

use crate::fetcher::Fetcher;

/// Background task that refreshes the cache once at start and then on a
/// fixed period until stopped.
pub struct RefreshScheduler {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl RefreshScheduler {
    pub fn start(fetcher: Arc<Fetcher>, interval: Duration) -> Self {
        let (shutdown, mut stop) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = refresh_ticker(interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = stop.changed() => break,
                }
                info!("Starting feed refresh");
                run_cycle(&fetcher).await;
            }

            info!("Background refresh stopped");
        });

        Self { shutdown, handle }
    }

    /// Signal the task to stop and wait for it. A cycle already in flight
    /// runs to completion first.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.handle.await {
            error!("Background refresh task ended abnormally: {}", e);
        }
    }
}

/// Fires at once, then every `period` measured from the first tick. A cycle
/// that overruns its slot pushes later ticks back rather than bunching them.
fn refresh_ticker(period: Duration) -> Interval {
    let mut ticker = tokio::time::interval(period.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// Run one cycle on its own task so a panic aborts only that cycle. The cache
/// is written last, so an aborted cycle leaves the previous generation.
async fn run_cycle(fetcher: &Arc<Fetcher>) {
    let fetcher = fetcher.clone();
    if let Err(e) = tokio::spawn(async move { fetcher.refresh_all_feeds().await }).await {
        error!("Feed refresh cycle aborted: {}", e);
    }
}

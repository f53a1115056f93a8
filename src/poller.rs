use crate::avg::RunningAverage;
use crate::slot::SlotKey;
use crate::store::Store;
use crate::time;
use crate::upstream::SensorClient;
use crate::Value;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Handle to the background poll loop.
///
/// Aborts the task when dropped. Writes only happen after a fetch has
/// completed successfully, so aborting an in-flight cycle cannot leave a
/// partially updated record behind.
#[derive(Debug)]
pub struct Poller {
    task: tokio::task::JoinHandle<()>,
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl Poller {
    /// Spawns the poll loop onto the current tokio runtime.
    #[must_use]
    pub fn start(store: Arc<Store>, client: SensorClient, period: Duration) -> Self {
        Self {
            task: tokio::task::spawn(poll_loop(store, client, period)),
        }
    }
}

/// Timer loop driving one fetch-and-persist cycle per tick.
///
/// At most one cycle is in flight at a time; a cycle overrunning the
/// period delays the next tick instead of overlapping it. A failed cycle
/// is logged and skipped, leaving both tables unchanged by that cycle;
/// the next tick is the retry.
async fn poll_loop(store: Arc<Store>, client: SensorClient, period: Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    log::info!("starting poll loop, one cycle every {period:?}");

    loop {
        interval.tick().await;

        if let Err(error) = poll_cycle(&store, &client).await {
            log::error!("poll cycle failed, skipping: {error}");
        }
    }
}

/// One poll cycle: fetch a reading from upstream and record it.
async fn poll_cycle(store: &Store, client: &SensorClient) -> crate::Result<()> {
    let reading = client.fetch().await?;
    let now = time::now();

    let folded = record(store, &now, reading.value)?;

    log::info!(
        "recorded {} for slot {} (avg {:.2}, weight {})",
        reading.value,
        SlotKey::at(&now),
        folded.value(),
        folded.weight(),
    );

    Ok(())
}

/// Persists one observation: folds it into the slot's running average and
/// appends it to the raw history log.
///
/// The two writes are independent. If the history append fails (for
/// example on a duplicate minute-resolution timestamp), the already
/// committed stat update stays in place.
pub(crate) fn record(
    store: &Store,
    instant: &DateTime<Utc>,
    value: Value,
) -> crate::Result<RunningAverage> {
    let slot = SlotKey::at(instant);

    let folded = store.record_stat(&slot, value)?;
    store.append_history(instant, value)?;

    Ok(folded)
}

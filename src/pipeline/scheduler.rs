//! Ingest scheduler — fixed-interval polling task.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::info;

use crate::pipeline::processor::IngestProcessor;

/// Spawn a background task that runs the ingest pipeline on a fixed
/// interval.
///
/// Returns a `JoinHandle` and a shutdown flag. Set the flag to stop
/// polling at the next tick.
pub fn spawn_ingest_poller(
    processor: Arc<IngestProcessor>,
    interval: Duration,
) -> (JoinHandle<()>, Arc<AtomicBool>) {
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_flag = Arc::clone(&shutdown);

    let handle = tokio::spawn(async move {
        info!(
            "Ingest poller started — ticking every {}s",
            interval.as_secs()
        );

        let mut tick = tokio::time::interval(interval);

        loop {
            tick.tick().await;

            if shutdown.load(Ordering::Relaxed) {
                info!("Ingest poller shutting down");
                return;
            }

            let summary = processor.run_once().await;
            info!(
                queued = summary.queued,
                already_seen = summary.already_seen,
                irrelevant = summary.irrelevant,
                source_errors = summary.source_errors,
                item_errors = summary.item_errors,
                "ingest tick complete"
            );
        }
    });

    (handle, shutdown_flag)
}

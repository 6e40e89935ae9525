//! Periodic collection loop.
//!
//! Each tick runs discovery then metrics on the blocking pool. A consumer task
//! drains the queue and prints every item. Failed cycles are logged and the
//! loop keeps going.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use blackbird_diskstats::{DiskStatsCollector, DiskStatsJob, Emittable, Item, PluginConfig};

pub async fn command_run(
    config: PluginConfig,
    collector: DiskStatsCollector,
    interval: u64,
    queue_size: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, mut rx) = mpsc::channel::<Item>(queue_size.max(1));
    let job = Arc::new(DiskStatsJob::new(config, collector, Arc::new(tx)));

    let consumer = tokio::spawn(async move {
        while let Some(item) = rx.recv().await {
            match serde_json::to_string(&item.data()) {
                Ok(line) => println!("{line}"),
                Err(e) => warn!("Failed to serialize item {}: {}", item.key(), e),
            }
        }
        debug!("Queue closed, consumer exiting");
    });

    info!(
        "Collecting from {} every {}s",
        job.collector().source().display(),
        interval
    );

    run_loop(
        Arc::clone(&job),
        Duration::from_secs(interval.max(1)),
        tokio::signal::ctrl_c(),
    )
    .await;
    info!("Received Ctrl-C, shutting down");

    // Dropping the last job handle closes the queue
    drop(job);
    consumer.await?;
    Ok(())
}

/// Runs cycles every `period` until `shutdown` completes.
///
/// `shutdown` lives across iterations, so a signal raised while a cycle is
/// running is seen on the next pass.
async fn run_loop<S>(job: Arc<DiskStatsJob>, period: Duration, shutdown: S)
where
    S: Future,
{
    tokio::pin!(shutdown);

    let mut ticker = tokio::time::interval(period);
    loop {
        tokio::select! {
            // Poll shutdown first so its listener exists before the first cycle
            biased;

            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                let job = Arc::clone(&job);
                let cycle = tokio::task::spawn_blocking(move || {
                    job.build_discovery_items()?;
                    job.build_items()
                })
                .await;

                match cycle {
                    Ok(Ok(())) => debug!("Collection cycle finished"),
                    Ok(Err(e)) => error!("Collection cycle failed: {}", e),
                    Err(e) => error!("Collection task panicked: {}", e),
                }
            }
        }
    }
}

//! Job invoked by the host executor.
//!
//! Wraps collector output into items, tags them with the configured host name
//! and puts them on the host queue without blocking.

use std::sync::Arc;
use tracing::debug;

use crate::collectors::diskstats::DiskStatsCollector;
use crate::config::PluginConfig;
use crate::error::PluginError;
use crate::item::{DiscoveryItem, Item, MetricItem};
use crate::queue::{ItemSink, VecSink};

pub struct DiskStatsJob {
    config: PluginConfig,
    collector: DiskStatsCollector,
    queue: Arc<dyn ItemSink>,
}

impl DiskStatsJob {
    pub fn new(config: PluginConfig, collector: DiskStatsCollector, queue: Arc<dyn ItemSink>) -> Self {
        Self {
            config,
            collector,
            queue,
        }
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn collector(&self) -> &DiskStatsCollector {
        &self.collector
    }

    /// Metrics cycle: liveness items plus every device counter.
    pub fn build_items(&self) -> Result<(), PluginError> {
        self.collector.collect_metrics(|key, value| {
            let item = MetricItem::new(key, value, self.config.hostname.as_str());
            let (key, value) = (item.key.clone(), item.value.clone());
            self.queue.put_nowait(Item::Metric(item))?;
            debug!("Inserted to queue {}:{}", key, value);
            Ok(())
        })
    }

    /// Discovery cycle: one disk-name list.
    pub fn build_discovery_items(&self) -> Result<(), PluginError> {
        self.collector.collect_discovery(|key, value| {
            let item = DiscoveryItem::new(key, value, self.config.hostname.as_str());
            let key = item.key.clone();
            let payload = serde_json::to_string(&item.value).unwrap_or_default();
            self.queue.put_nowait(Item::Discovery(item))?;
            debug!("Inserted to lld queue {}:{}", key, payload);
            Ok(())
        })
    }
}

/// Runs one metrics cycle into an unbounded in-memory queue.
///
/// Used by one-shot callers that drain only after the cycle ends; a bounded
/// queue would overflow on hosts with many devices.
pub fn collect_items(
    config: PluginConfig,
    collector: DiskStatsCollector,
) -> Result<Vec<Item>, PluginError> {
    let sink = Arc::new(VecSink::new());
    DiskStatsJob::new(config, collector, sink.clone()).build_items()?;
    Ok(sink.drain())
}

/// Runs one discovery cycle into an unbounded in-memory queue.
pub fn discover_items(
    config: PluginConfig,
    collector: DiskStatsCollector,
) -> Result<Vec<Item>, PluginError> {
    let sink = Arc::new(VecSink::new());
    DiskStatsJob::new(config, collector, sink.clone()).build_discovery_items()?;
    Ok(sink.drain())
}

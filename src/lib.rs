//! Blackbird diskstats plugin
//!
//! Reads block-device I/O counters from `/proc/diskstats` and reports them to a
//! monitoring backend through a host-provided queue.
//!
//! # Features
//!
//! - **Metrics**: one `diskstats[<device>,<counter>]` item per device and counter
//! - **Discovery**: one `diskstats.disknames.LLD` item listing every disk
//! - **Liveness**: `blackbird.diskstats.ping` and `blackbird.diskstats.version`
//! - **Filtering**: `ramN` and `loopN` devices are never reported
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use blackbird_diskstats::{DiskStatsCollector, DiskStatsJob, PluginConfig, VecSink};
//!
//! let sink = Arc::new(VecSink::new());
//! let job = DiskStatsJob::new(PluginConfig::default(), DiskStatsCollector::default(), sink.clone());
//!
//! job.build_discovery_items()?;
//! job.build_items()?;
//!
//! for item in sink.drain() {
//!     println!("{:?}", item);
//! }
//! # Ok::<(), blackbird_diskstats::PluginError>(())
//! ```

pub mod collectors;
pub mod config;
pub mod error;
pub mod item;
pub mod job;
pub mod queue;

// Re-export main types for convenience
pub use collectors::diskstats::{
    is_virtual_device, DiskStats, DiskStatsCollector, DiskStatsSnapshot, PLUGIN_VERSION,
};
pub use config::{load_config, PluginConfig, Validator};
pub use error::PluginError;
pub use item::{DiscoveryEntry, DiscoveryItem, Emittable, Item, MetricItem, MetricValue};
pub use job::{collect_items, discover_items, DiskStatsJob};
pub use queue::{ItemSink, VecSink};

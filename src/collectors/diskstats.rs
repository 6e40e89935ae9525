//! Disk I/O statistics collector.
//!
//! This module reads block-device counters from /proc/diskstats, drops RAM and
//! loop devices, and hands the result to the host as metric and discovery values.
//!
//! Every call re-reads the source. Nothing is cached between calls, so the
//! collector can be shared freely across threads.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::PluginError;
use crate::item::{DiscoveryEntry, MetricValue};

/// Kernel-exposed block I/O table.
pub const DEFAULT_DISKSTATS_PATH: &str = "/proc/diskstats";

/// Version reported through the `blackbird.diskstats.version` item.
pub const PLUGIN_VERSION: &str = "0.1.0";

pub const PING_KEY: &str = "blackbird.diskstats.ping";
pub const VERSION_KEY: &str = "blackbird.diskstats.version";
pub const DISCOVERY_KEY: &str = "diskstats.disknames.LLD";

/// Counter names in /proc/diskstats column order, starting at field 3.
pub const COUNTER_NAMES: [&str; 11] = [
    "read_ios",
    "read_merges",
    "read_sectors",
    "read_ticks",
    "write_ios",
    "write_merges",
    "write_sectors",
    "write_ticks",
    "in_flight",
    "io_ticks",
    "time_in_queue",
];

/// Index of the device name column.
const NAME_FIELD: usize = 2;
/// Index of the first counter column.
const FIRST_COUNTER_FIELD: usize = 3;
const MIN_FIELDS: usize = FIRST_COUNTER_FIELD + COUNTER_NAMES.len();

static VIRTUAL_DEVICE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(ram|loop)[0-9]+$").expect("virtual device pattern is valid"));

/// Disk statistics for a single device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiskStats {
    pub major: u32,
    pub minor: u32,
    pub read_ios: u64,
    pub read_merges: u64,
    pub read_sectors: u64,
    pub read_ticks: u64,
    pub write_ios: u64,
    pub write_merges: u64,
    pub write_sectors: u64,
    pub write_ticks: u64,
    pub in_flight: u64,
    pub io_ticks: u64,
    pub time_in_queue: u64,
}

fn parse_field<T: std::str::FromStr>(
    device: &str,
    counter: &'static str,
    raw: &str,
) -> Result<T, PluginError> {
    raw.parse().map_err(|_| PluginError::MalformedField {
        device: device.to_string(),
        counter,
        value: raw.to_string(),
    })
}

impl DiskStats {
    /// Builds a record from the whitespace-split fields of one line.
    /// `parts` must hold at least the device number, name, and 11 counters.
    fn from_parts(parts: &[&str]) -> Result<Self, PluginError> {
        let device = parts[NAME_FIELD];
        let major = parse_field(device, "major", parts[0])?;
        let minor = parse_field(device, "minor", parts[1])?;

        let mut values = [0u64; 11];
        for ((slot, name), raw) in values
            .iter_mut()
            .zip(COUNTER_NAMES)
            .zip(&parts[FIRST_COUNTER_FIELD..MIN_FIELDS])
        {
            *slot = parse_field(device, name, raw)?;
        }

        let [read_ios, read_merges, read_sectors, read_ticks, write_ios, write_merges, write_sectors, write_ticks, in_flight, io_ticks, time_in_queue] =
            values;

        Ok(DiskStats {
            major,
            minor,
            read_ios,
            read_merges,
            read_sectors,
            read_ticks,
            write_ios,
            write_merges,
            write_sectors,
            write_ticks,
            in_flight,
            io_ticks,
            time_in_queue,
        })
    }

    /// Counter values in column order.
    pub fn values(&self) -> [u64; 11] {
        [
            self.read_ios,
            self.read_merges,
            self.read_sectors,
            self.read_ticks,
            self.write_ios,
            self.write_merges,
            self.write_sectors,
            self.write_ticks,
            self.in_flight,
            self.io_ticks,
            self.time_in_queue,
        ]
    }

    /// Counters paired with their names, in column order.
    pub fn counters(&self) -> [(&'static str, u64); 11] {
        let values = self.values();
        std::array::from_fn(|i| (COUNTER_NAMES[i], values[i]))
    }
}

/// One complete parse of the source, keyed by device name.
pub type DiskStatsSnapshot = HashMap<String, DiskStats>;

/// Returns true for RAM-backed and loopback devices (`ram0`, `loop12`, ...).
///
/// Both the metrics and the discovery path filter through this predicate.
pub fn is_virtual_device(name: &str) -> bool {
    VIRTUAL_DEVICE_RE.is_match(name)
}

/// Item key for one device counter, e.g. `diskstats[sda,read_ios]`.
pub fn metric_key(device: &str, counter: &str) -> String {
    format!("diskstats[{},{}]", device, counter)
}

/// Parses diskstats content.
///
/// Format: major minor name read_ios read_merges read_sectors read_ticks write_ios
/// write_merges write_sectors write_ticks in_flight io_ticks time_in_queue [...]
///
/// Newer kernels append discard and flush columns; those are ignored. A device
/// listed twice keeps its last line.
pub fn parse_diskstats<R: BufRead>(reader: R, path: &Path) -> Result<DiskStatsSnapshot, PluginError> {
    let mut stats = DiskStatsSnapshot::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| PluginError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        if parts.len() > NAME_FIELD && is_virtual_device(parts[NAME_FIELD]) {
            continue;
        }

        if parts.len() < MIN_FIELDS {
            return Err(PluginError::MalformedLine {
                line: idx + 1,
                fields: parts.len(),
            });
        }

        let disk_stat = DiskStats::from_parts(&parts)?;
        stats.insert(parts[NAME_FIELD].to_string(), disk_stat);
    }

    Ok(stats)
}

/// Reads and parses a diskstats table from `path`.
pub fn read_diskstats(path: &Path) -> Result<DiskStatsSnapshot, PluginError> {
    let file = File::open(path).map_err(|source| PluginError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    parse_diskstats(BufReader::new(file), path)
}

/// Stateless collector over a diskstats source.
#[derive(Debug, Clone)]
pub struct DiskStatsCollector {
    source: PathBuf,
}

impl Default for DiskStatsCollector {
    fn default() -> Self {
        Self::new(DEFAULT_DISKSTATS_PATH)
    }
}

impl DiskStatsCollector {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Re-reads the source and returns a fresh snapshot.
    pub fn read_snapshot(&self) -> Result<DiskStatsSnapshot, PluginError> {
        read_diskstats(&self.source)
    }

    /// Emits the liveness pair followed by every device counter.
    ///
    /// The snapshot is fully parsed before the first emission, so a source
    /// failure never produces partial output.
    pub fn collect_metrics<F>(&self, mut emit: F) -> Result<(), PluginError>
    where
        F: FnMut(String, MetricValue) -> Result<(), PluginError>,
    {
        let snapshot = self.read_snapshot()?;

        emit(PING_KEY.to_string(), MetricValue::Integer(1))?;
        emit(
            VERSION_KEY.to_string(),
            MetricValue::Text(PLUGIN_VERSION.to_string()),
        )?;

        for (device, stats) in &snapshot {
            for (counter, value) in stats.counters() {
                emit(metric_key(device, counter), MetricValue::Integer(value))?;
            }
        }

        Ok(())
    }

    /// Emits the single disk-name discovery payload.
    pub fn collect_discovery<F>(&self, mut emit: F) -> Result<(), PluginError>
    where
        F: FnMut(String, Vec<DiscoveryEntry>) -> Result<(), PluginError>,
    {
        let snapshot = self.read_snapshot()?;
        let entries = snapshot.into_keys().map(DiscoveryEntry::new).collect();
        emit(DISCOVERY_KEY.to_string(), entries)
    }
}

//! Items handed to the host queue.
//!
//! The host sees every item as a flat record `{key, value, host, clock}`.
//! Metric items carry a scalar value, discovery items carry the list of
//! discovered disk names.

use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;

/// Scalar metric value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Integer(u64),
    Text(String),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Integer(v) => write!(f, "{}", v),
            MetricValue::Text(s) => f.write_str(s),
        }
    }
}

/// One low-level-discovery row, serialized as `{"{#DISKNAME}": "<name>"}`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct DiscoveryEntry {
    #[serde(rename = "{#DISKNAME}")]
    pub disk_name: String,
}

impl DiscoveryEntry {
    pub fn new(disk_name: impl Into<String>) -> Self {
        Self {
            disk_name: disk_name.into(),
        }
    }
}

/// Shared capability of everything the host queue accepts.
pub trait Emittable {
    fn key(&self) -> &str;
    fn host(&self) -> &str;
    /// Unix timestamp assigned at construction.
    fn clock(&self) -> i64;
    /// Host-facing record.
    fn data(&self) -> Value;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricItem {
    pub key: String,
    pub value: MetricValue,
    pub host: String,
    pub clock: i64,
}

impl MetricItem {
    pub fn new(key: impl Into<String>, value: MetricValue, host: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value,
            host: host.into(),
            clock: Utc::now().timestamp(),
        }
    }
}

impl Emittable for MetricItem {
    fn key(&self) -> &str {
        &self.key
    }

    fn host(&self) -> &str {
        &self.host
    }

    fn clock(&self) -> i64 {
        self.clock
    }

    fn data(&self) -> Value {
        json!({
            "key": self.key,
            "value": self.value,
            "host": self.host,
            "clock": self.clock,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveryItem {
    pub key: String,
    pub value: Vec<DiscoveryEntry>,
    pub host: String,
    pub clock: i64,
}

impl DiscoveryItem {
    pub fn new(key: impl Into<String>, value: Vec<DiscoveryEntry>, host: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value,
            host: host.into(),
            clock: Utc::now().timestamp(),
        }
    }
}

impl Emittable for DiscoveryItem {
    fn key(&self) -> &str {
        &self.key
    }

    fn host(&self) -> &str {
        &self.host
    }

    fn clock(&self) -> i64 {
        self.clock
    }

    fn data(&self) -> Value {
        json!({
            "key": self.key,
            "value": self.value,
            "host": self.host,
            "clock": self.clock,
        })
    }
}

/// Anything the job enqueues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Item {
    Metric(MetricItem),
    Discovery(DiscoveryItem),
}

impl Item {
    pub fn as_metric(&self) -> Option<&MetricItem> {
        match self {
            Item::Metric(m) => Some(m),
            Item::Discovery(_) => None,
        }
    }

    pub fn as_discovery(&self) -> Option<&DiscoveryItem> {
        match self {
            Item::Discovery(d) => Some(d),
            Item::Metric(_) => None,
        }
    }
}

impl Emittable for Item {
    fn key(&self) -> &str {
        match self {
            Item::Metric(m) => m.key(),
            Item::Discovery(d) => d.key(),
        }
    }

    fn host(&self) -> &str {
        match self {
            Item::Metric(m) => m.host(),
            Item::Discovery(d) => d.host(),
        }
    }

    fn clock(&self) -> i64 {
        match self {
            Item::Metric(m) => m.clock(),
            Item::Discovery(d) => d.clock(),
        }
    }

    fn data(&self) -> Value {
        match self {
            Item::Metric(m) => m.data(),
            Item::Discovery(d) => d.data(),
        }
    }
}

impl From<MetricItem> for Item {
    fn from(item: MetricItem) -> Self {
        Item::Metric(item)
    }
}

impl From<DiscoveryItem> for Item {
    fn from(item: DiscoveryItem) -> Self {
        Item::Discovery(item)
    }
}

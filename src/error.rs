//! Error type raised by the diskstats plugin.
//!
//! Every failure aborts the current collection cycle and is handed back to the
//! host unchanged. Retry policy and logging of failed cycles belong to the host.

use std::io;
use std::path::PathBuf;

/// Unrecoverable failure of a collection cycle.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("can not open {}: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed diskstats field {counter} for {device}: {value:?}")]
    MalformedField {
        device: String,
        counter: &'static str,
        value: String,
    },

    #[error("malformed diskstats line {line}: expected at least 14 fields, got {fields}")]
    MalformedLine { line: usize, fields: usize },

    #[error("queue is full, dropped item {key}")]
    QueueFull { key: String },

    #[error("queue is closed, dropped item {key}")]
    QueueClosed { key: String },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl PluginError {
    /// True for failures caused by the statistics source itself rather than the host.
    pub fn is_source_error(&self) -> bool {
        matches!(
            self,
            PluginError::SourceUnavailable { .. }
                | PluginError::MalformedField { .. }
                | PluginError::MalformedLine { .. }
        )
    }
}

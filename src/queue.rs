//! Host queue abstraction.
//!
//! The job never blocks on the queue. A full queue is reported back as
//! `PluginError::QueueFull` and the host decides what to do with the cycle.

use std::sync::Mutex;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::error::PluginError;
use crate::item::{Emittable, Item};

/// Non-blocking sink for items.
pub trait ItemSink: Send + Sync {
    fn put_nowait(&self, item: Item) -> Result<(), PluginError>;
}

impl ItemSink for mpsc::Sender<Item> {
    fn put_nowait(&self, item: Item) -> Result<(), PluginError> {
        self.try_send(item).map_err(|e| match e {
            TrySendError::Full(item) => PluginError::QueueFull {
                key: item.key().to_string(),
            },
            TrySendError::Closed(item) => PluginError::QueueClosed {
                key: item.key().to_string(),
            },
        })
    }
}

/// Unbounded in-memory sink, used by one-shot commands and tests.
#[derive(Debug, Default)]
pub struct VecSink {
    items: Mutex<Vec<Item>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes every item collected so far.
    pub fn drain(&self) -> Vec<Item> {
        match self.items.lock() {
            Ok(mut items) => std::mem::take(&mut *items),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    pub fn len(&self) -> usize {
        self.items.lock().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ItemSink for VecSink {
    fn put_nowait(&self, item: Item) -> Result<(), PluginError> {
        match self.items.lock() {
            Ok(mut items) => items.push(item),
            Err(poisoned) => poisoned.into_inner().push(item),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{MetricItem, MetricValue};

    fn item(key: &str) -> Item {
        MetricItem::new(key, MetricValue::Integer(1), "h").into()
    }

    #[test]
    fn test_bounded_queue_reports_full() {
        let (tx, mut rx) = mpsc::channel::<Item>(1);
        tx.put_nowait(item("first")).unwrap();

        match tx.put_nowait(item("second")) {
            Err(PluginError::QueueFull { key }) => assert_eq!(key, "second"),
            other => panic!("expected QueueFull, got {:?}", other),
        }

        assert_eq!(rx.try_recv().unwrap().key(), "first");
    }

    #[test]
    fn test_closed_queue_reports_closed() {
        let (tx, rx) = mpsc::channel::<Item>(4);
        drop(rx);
        assert!(matches!(
            tx.put_nowait(item("k")),
            Err(PluginError::QueueClosed { .. })
        ));
    }

    #[test]
    fn test_vec_sink_drain() {
        let sink = VecSink::new();
        sink.put_nowait(item("a")).unwrap();
        sink.put_nowait(item("b")).unwrap();
        assert_eq!(sink.len(), 2);

        let items = sink.drain();
        assert_eq!(items.len(), 2);
        assert!(sink.is_empty());
    }
}

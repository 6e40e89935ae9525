//! Integration tests for the host-facing job.
//!
//! These tests run full metrics and discovery cycles into in-memory and
//! bounded tokio queues and inspect the resulting item records.

use std::io::Write;
use std::sync::Arc;

use blackbird_diskstats::{
    collect_items, discover_items, DiskStatsCollector, DiskStatsJob, Emittable, Item, ItemSink,
    PluginConfig, PluginError, VecSink,
};
use serde_json::json;
use tempfile::NamedTempFile;
use tokio::sync::mpsc;

const SDA_AND_LOOP: &str = "\
   8       0 sda 0 1 2 3 4 5 6 7 8 9 10
   7       0 loop0 52 0 2090 11 0 0 0 0 0 40 11
";

fn source_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn config() -> PluginConfig {
    PluginConfig {
        hostname: "web01.example.com".to_string(),
    }
}

fn job_with_sink(source: &NamedTempFile, sink: Arc<dyn ItemSink>) -> DiskStatsJob {
    DiskStatsJob::new(config(), DiskStatsCollector::new(source.path()), sink)
}

#[test]
fn test_build_items_enqueues_metric_records() {
    let source = source_file(SDA_AND_LOOP);
    let sink = Arc::new(VecSink::new());
    let job = job_with_sink(&source, sink.clone());

    job.build_items().unwrap();
    let items = sink.drain();

    assert_eq!(items.len(), 13);
    assert!(items.iter().all(|i| i.as_metric().is_some()));
    assert!(items.iter().all(|i| !i.key().contains("loop0")));

    let read_sectors = items
        .iter()
        .find(|i| i.key() == "diskstats[sda,read_sectors]")
        .expect("diskstats[sda,read_sectors] not found");
    let data = read_sectors.data();
    assert_eq!(data["value"], 2);
    assert_eq!(data["host"], "web01.example.com");
    assert!(data["clock"].as_i64().unwrap() > 0);

    let version = items
        .iter()
        .find(|i| i.key() == "blackbird.diskstats.version")
        .expect("version item not found");
    assert_eq!(version.data()["value"], "0.1.0");
}

#[test]
fn test_build_discovery_items_enqueues_one_record() {
    let source = source_file(SDA_AND_LOOP);
    let sink = Arc::new(VecSink::new());
    let job = job_with_sink(&source, sink.clone());

    job.build_discovery_items().unwrap();
    let items = sink.drain();

    assert_eq!(items.len(), 1);
    let item = items[0].as_discovery().expect("expected discovery item");
    assert_eq!(item.key, "diskstats.disknames.LLD");
    assert_eq!(items[0].data()["value"], json!([{"{#DISKNAME}": "sda"}]));
    assert_eq!(items[0].host(), "web01.example.com");
}

#[test]
fn test_unavailable_source_enqueues_nothing() {
    let sink = Arc::new(VecSink::new());
    let job = DiskStatsJob::new(
        config(),
        DiskStatsCollector::new("/nonexistent/path/diskstats"),
        sink.clone(),
    );

    assert!(matches!(
        job.build_items(),
        Err(PluginError::SourceUnavailable { .. })
    ));
    assert!(matches!(
        job.build_discovery_items(),
        Err(PluginError::SourceUnavailable { .. })
    ));
    assert!(sink.is_empty());
}

#[test]
fn test_full_queue_does_not_block() {
    let source = source_file(SDA_AND_LOOP);
    let (tx, mut rx) = mpsc::channel::<Item>(5);
    let job = job_with_sink(&source, Arc::new(tx));

    match job.build_items() {
        Err(PluginError::QueueFull { .. }) => {}
        other => panic!("expected QueueFull, got {:?}", other),
    }

    let mut received = 0;
    while rx.try_recv().is_ok() {
        received += 1;
    }
    assert_eq!(received, 5);
}

#[test]
fn test_tokio_queue_receives_all_items() {
    let source = source_file(SDA_AND_LOOP);
    let (tx, mut rx) = mpsc::channel::<Item>(64);
    let job = job_with_sink(&source, Arc::new(tx));

    job.build_discovery_items().unwrap();
    job.build_items().unwrap();
    drop(job);

    let mut items = Vec::new();
    while let Ok(item) = rx.try_recv() {
        items.push(item);
    }

    assert_eq!(items.len(), 14);
    assert!(matches!(items[0], Item::Discovery(_)));
    assert_eq!(items[1].key(), "blackbird.diskstats.ping");
}

#[test]
fn test_concurrent_jobs_do_not_interfere() {
    let source = source_file(SDA_AND_LOOP);
    let sinks: Vec<Arc<VecSink>> = (0..4).map(|_| Arc::new(VecSink::new())).collect();

    std::thread::scope(|s| {
        for sink in &sinks {
            let job = job_with_sink(&source, sink.clone());
            s.spawn(move || job.build_items().unwrap());
        }
    });

    for sink in &sinks {
        let mut keys: Vec<String> = sink.drain().iter().map(|i| i.key().to_string()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 13);
    }
}

/// Helper function to build a source with `count` partitions plus loop devices.
fn many_devices(count: usize) -> NamedTempFile {
    let mut content = String::new();
    for i in 0..count {
        content.push_str(&format!("8 {} sdx{} 0 1 2 3 4 5 6 7 8 9 10\n", i, i));
    }
    for i in 0..8 {
        content.push_str(&format!("7 {} loop{} 0 0 0 0 0 0 0 0 0 0 0\n", i, i));
    }
    source_file(&content)
}

#[test]
fn test_collect_items_handles_many_devices() {
    let devices = 120;
    let source = many_devices(devices);

    let items = collect_items(config(), DiskStatsCollector::new(source.path())).unwrap();

    assert_eq!(items.len(), 11 * devices + 2);
    assert!(items.iter().all(|i| !i.key().contains("loop")));
    assert!(items
        .iter()
        .any(|i| i.key() == "diskstats[sdx119,time_in_queue]"));
}

#[test]
fn test_discover_items_handles_many_devices() {
    let devices = 120;
    let source = many_devices(devices);

    let items = discover_items(config(), DiskStatsCollector::new(source.path())).unwrap();

    assert_eq!(items.len(), 1);
    let discovery = items[0].as_discovery().expect("expected discovery item");
    assert_eq!(discovery.value.len(), devices);
}

#[test]
fn test_collect_items_unavailable_source() {
    let result = collect_items(
        config(),
        DiskStatsCollector::new("/nonexistent/path/diskstats"),
    );
    assert!(matches!(result, Err(PluginError::SourceUnavailable { .. })));
}

//! Single-cycle commands.
//!
//! Items are queued in memory for the whole cycle, then printed as JSON lines.

use blackbird_diskstats::{
    collect_items, discover_items, DiskStatsCollector, Emittable, Item, PluginConfig,
};

fn print_items(items: &[Item]) -> Result<(), Box<dyn std::error::Error>> {
    for item in items {
        println!("{}", serde_json::to_string(&item.data())?);
    }
    Ok(())
}

/// Runs one metrics cycle.
pub fn command_collect(
    config: PluginConfig,
    collector: DiskStatsCollector,
) -> Result<(), Box<dyn std::error::Error>> {
    let items = collect_items(config, collector)?;
    print_items(&items)?;
    tracing::info!("Collected {} items", items.len());
    Ok(())
}

/// Runs one discovery cycle.
pub fn command_discover(
    config: PluginConfig,
    collector: DiskStatsCollector,
) -> Result<(), Box<dyn std::error::Error>> {
    let items = discover_items(config, collector)?;
    print_items(&items)
}

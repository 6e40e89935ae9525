//! Check command implementation.
//!
//! Validates the diskstats source and the effective configuration.

use blackbird_diskstats::{DiskStatsCollector, PluginConfig, Validator};

pub fn command_check(
    config: &PluginConfig,
    collector: &DiskStatsCollector,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Blackbird diskstats - System Check");
    println!("=====================================");

    let mut all_ok = true;

    println!("\n📁 Checking {} ...", collector.source().display());
    match collector.read_snapshot() {
        Ok(snapshot) => {
            println!("   ✅ Source readable");
            if snapshot.is_empty() {
                println!("   ⚠️  No physical block devices reported");
            } else {
                let mut names: Vec<&String> = snapshot.keys().collect();
                names.sort();
                println!("   ✅ {} devices: {}", names.len(), join(&names));
            }
        }
        Err(e) => {
            println!("   ❌ {}", e);
            all_ok = false;
        }
    }

    println!("\n⚙️  Checking configuration...");
    match Validator::new().validate(config) {
        Ok(()) => println!("   ✅ Configuration is valid (hostname={})", config.hostname),
        Err(e) => {
            println!("   ❌ {}", e);
            all_ok = false;
        }
    }

    println!("\n📋 Summary:");
    if all_ok {
        println!("   ✅ All checks passed");
        Ok(())
    } else {
        println!("   ❌ Some checks failed");
        std::process::exit(1);
    }
}

fn join(names: &[&String]) -> String {
    names
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

//! Config command implementations.

use std::collections::BTreeMap;

use blackbird_diskstats::config::MODULE_NAME;
use blackbird_diskstats::{PluginConfig, Validator};

use crate::cli::ConfigFormat;

/// Prints the effective configuration wrapped in its section.
pub fn command_show_config(
    config: &PluginConfig,
    format: ConfigFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = BTreeMap::new();
    file.insert(MODULE_NAME, config);

    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(&file)?,
        ConfigFormat::Toml => toml::to_string_pretty(&file)?,
        ConfigFormat::Yaml => serde_yaml::to_string(&file)?,
    };

    println!("{output}");
    Ok(())
}

pub fn command_schema() -> Result<(), Box<dyn std::error::Error>> {
    for line in Validator::new().spec() {
        println!("{line}");
    }
    Ok(())
}

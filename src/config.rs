//! Configuration for the diskstats plugin.
//!
//! The plugin owns a single config section named after the module
//! (`diskstats`) with one option, `hostname`. Files may be YAML, JSON, or TOML;
//! sections belonging to other plugins are ignored.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::PluginError;

/// Config section name.
pub const MODULE_NAME: &str = "diskstats";

/// Locations searched when no config file is given.
pub const DEFAULT_CONFIG_PATHS: [&str; 5] = [
    "/etc/blackbird/conf.d/diskstats.yaml",
    "/etc/blackbird/conf.d/diskstats.yml",
    "/etc/blackbird/conf.d/diskstats.json",
    "/etc/blackbird/conf.d/diskstats.toml",
    "./blackbird-diskstats.yaml",
];

/// Options of the `[diskstats]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginConfig {
    /// Host name attached to every item
    #[serde(default = "detect_hostname")]
    pub hostname: String,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            hostname: detect_hostname(),
        }
    }
}

/// Whole config file; only our section is read.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    diskstats: Option<PluginConfig>,
}

/// Best-effort local host name.
pub fn detect_hostname() -> String {
    if let Ok(name) = nix::unistd::gethostname() {
        let name = name.to_string_lossy().trim().to_string();
        if !name.is_empty() {
            return name;
        }
    }

    match fs::read_to_string("/proc/sys/kernel/hostname") {
        Ok(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => {
            debug!("Could not detect hostname, using localhost");
            "localhost".to_string()
        }
    }
}

/// Schema and validation rules exposed to the host.
#[derive(Debug, Default, Clone, Copy)]
pub struct Validator;

impl Validator {
    pub fn new() -> Self {
        Self
    }

    /// Schema lines in the host's `section` / `option=type(default=...)` notation.
    pub fn spec(&self) -> Vec<String> {
        vec![
            format!("[{}]", MODULE_NAME),
            format!("hostname=string(default={})", detect_hostname()),
        ]
    }

    pub fn validate(&self, config: &PluginConfig) -> Result<(), PluginError> {
        if config.hostname.trim().is_empty() {
            return Err(PluginError::Config("hostname must not be empty".into()));
        }
        if config.hostname.chars().any(char::is_whitespace) {
            return Err(PluginError::Config(format!(
                "hostname must not contain whitespace: {:?}",
                config.hostname
            )));
        }
        Ok(())
    }
}

/// Loads the plugin section from `path`, or from the first default location
/// that exists. A missing file or section yields defaults.
pub fn load_config(path: Option<&Path>) -> Result<PluginConfig, PluginError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match DEFAULT_CONFIG_PATHS.iter().find(|p| Path::new(p).exists()) {
            Some(p) => PathBuf::from(p),
            None => return Ok(PluginConfig::default()),
        },
    };

    if !path.exists() {
        return Ok(PluginConfig::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| PluginError::Config(format!("{}: {}", path.display(), e)))?;

    let file = parse_config(&content, &path)?;
    info!("Loaded configuration from: {}", path.display());
    Ok(file.diskstats.unwrap_or_default())
}

fn parse_config(content: &str, path: &Path) -> Result<ConfigFile, PluginError> {
    let parse_err = |e: String| PluginError::Config(format!("{}: {}", path.display(), e));

    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(content).map_err(|e| parse_err(e.to_string())),
        Some("toml") => toml::from_str(content).map_err(|e| parse_err(e.to_string())),
        _ => {
            // Default to YAML; an empty YAML document is a null value
            if content.trim().is_empty() {
                return Ok(ConfigFile::default());
            }
            serde_yaml::from_str(content).map_err(|e| parse_err(e.to_string()))
        }
    }
}

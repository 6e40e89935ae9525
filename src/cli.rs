//! CLI arguments and subcommands for blackbird-diskstats.
//!
//! The binary is a small driver around the plugin library: it runs single
//! collection cycles, a periodic loop, and a few configuration helpers.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use blackbird_diskstats::collectors::diskstats::DEFAULT_DISKSTATS_PATH;

/// Log level options for CLI parsing
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Configuration format options for output
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "blackbird-diskstats",
    about = "Report /proc/diskstats block-device counters as blackbird items",
    long_about = "Report /proc/diskstats block-device counters as blackbird items.\n\n\
                  Reads per-device I/O counters, skips ram and loop devices, and prints \
                  metric and disk discovery items as JSON lines.",
    version,
    propagate_version = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (YAML/JSON/TOML) with a [diskstats] section
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Host name attached to items (overrides config)
    #[arg(long, global = true)]
    pub hostname: Option<String>,

    /// Diskstats source file
    #[arg(long, global = true, default_value = DEFAULT_DISKSTATS_PATH)]
    pub source: PathBuf,

    /// Log level
    #[arg(long, value_enum, default_value = "warn", global = true)]
    pub log_level: LogLevel,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one metrics cycle and print the items (default)
    Collect,

    /// Run one discovery cycle and print the item
    Discover,

    /// Run discovery and metrics cycles periodically until Ctrl-C
    Run {
        /// Seconds between cycles
        #[arg(short = 'i', long, default_value_t = 60)]
        interval: u64,

        /// Queue capacity; a cycle emits 11 items per device plus 2
        #[arg(long, default_value_t = 16384)]
        queue_size: usize,
    },

    /// Check that the source is readable and the configuration is valid
    Check,

    /// Print the effective configuration
    ShowConfig {
        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,
    },

    /// Print the configuration schema exposed to the host
    Schema,
}

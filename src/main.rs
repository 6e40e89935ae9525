//! blackbird-diskstats
//!
//! Driver binary for the diskstats plugin. Resolves configuration, sets up
//! tracing, and dispatches subcommands.

mod cli;
mod commands;

use clap::Parser;
use tracing::{debug, Level};

use blackbird_diskstats::{load_config, DiskStatsCollector, PluginConfig, Validator};
use cli::{Args, Commands, LogLevel};
use commands::{
    command_check, command_collect, command_discover, command_run, command_schema,
    command_show_config,
};

/// Initializes tracing logging subsystem with configured log level.
fn setup_logging(args: &Args) {
    let log_level = match args.log_level {
        LogLevel::Off => return,
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    };

    // Items go to stdout, logs to stderr
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    debug!("Logging initialized with level: {:?}", args.log_level);
}

/// Resolves configuration from CLI args, config file, and defaults.
/// Precedence: CLI (if provided) > config file > default.
fn resolve_config(args: &Args) -> Result<PluginConfig, Box<dyn std::error::Error>> {
    let mut config = if args.no_config {
        PluginConfig::default()
    } else {
        load_config(args.config.as_deref())?
    };

    if let Some(hostname) = &args.hostname {
        config.hostname = hostname.clone();
    }

    Ok(config)
}

/// Main application entry point.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    setup_logging(&args);

    let config = resolve_config(&args)?;
    let collector = DiskStatsCollector::new(args.source.clone());

    let command = args
        .command
        .unwrap_or(Commands::Collect);

    match command {
        Commands::Check => return command_check(&config, &collector),
        Commands::ShowConfig { format } => return command_show_config(&config, format),
        Commands::Schema => return command_schema(),
        _ => {
            // Collection commands need a valid config
        }
    }

    if let Err(e) = Validator::new().validate(&config) {
        eprintln!("❌ Configuration invalid: {}", e);
        std::process::exit(1);
    }

    match command {
        Commands::Collect => command_collect(config, collector),
        Commands::Discover => command_discover(config, collector),
        Commands::Run {
            interval,
            queue_size,
        } => command_run(config, collector, interval, queue_size).await,
        Commands::Check | Commands::ShowConfig { .. } | Commands::Schema => {
            unreachable!("handled above")
        }
    }
}

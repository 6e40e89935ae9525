//! CLI command implementations for blackbird-diskstats.
//!
//! - `collect` / `discover`: single collection cycles
//! - `run`: periodic collection loop
//! - `check`: source and configuration validation
//! - `config`: effective configuration and schema output

pub mod check;
pub mod collect;
pub mod config;
pub mod run;

pub use check::command_check;
pub use collect::{command_collect, command_discover};
pub use config::{command_schema, command_show_config};
pub use run::command_run;

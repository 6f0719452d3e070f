//! Process wiring for the `storepulse` binary: flags, logging, startup.

mod bootstrap;
mod cli_args;
mod startup;

pub use bootstrap::init_tracing;
pub use cli_args::Cli;
pub use startup::{build_startup_config, run_storepulse, StartupConfig};

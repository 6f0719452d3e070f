use anyhow::Result;
use clap::Parser;
use storepulse_cli::{init_tracing, run_storepulse, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    run_storepulse(Cli::parse()).await
}

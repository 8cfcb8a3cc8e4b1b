//! Installer QA - drive install/start/stop/uninstall of a packaged server on a VM

#![cfg_attr(test, allow(clippy::expect_used))]

use clap::Parser;
use tracing_subscriber::EnvFilter;

use installer_qa::cli::Cli;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = cli.run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

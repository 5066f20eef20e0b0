//! toolwright CLI binary entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use toolwright::cli::{commands, Cli};
use toolwright::config::ToolwrightConfig;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ToolwrightConfig::from_env() {
        Ok(config) => cli.apply(config),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let default_level = if config.debug() { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = commands::run(cli.command, &config).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

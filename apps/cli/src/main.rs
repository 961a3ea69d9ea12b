//! # Bakery Manager Entry Point
//!
//! ```text
//! bakery                    interactive menu on ./bakery.db
//! bakery --db shop.db       same, on another store
//! bakery demo               seed ./demo_bakery.db and print statistics
//! bakery report --json      sales summary as JSON
//! ```
//!
//! Logs go to stderr so they never mix with menus or JSON on stdout.
//! Exit code is 0 on success (including end of input in the shell) and 1 on
//! any fatal error.

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use bakery_cli::args::Cli;
use bakery_cli::config::AppConfig;

#[tokio::main]
async fn main() {
    let config = AppConfig::from_cli(Cli::parse());
    init_tracing(&config);

    if let Err(err) = bakery_cli::run(&config).await {
        debug!(error = ?err, "Fatal error");
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins; otherwise the level follows `-v`.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

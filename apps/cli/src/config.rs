//! # Application Configuration
//!
//! Resolved settings for one run of `bakery`.
//!
//! ## Sources (Priority Order)
//! 1. Command-line flags (`--db`, `-v`)
//! 2. `RUST_LOG` (log filter only)
//! 3. Defaults (this file)
//!
//! The store path never comes from the environment.

use std::path::PathBuf;

use bakery_db::{DbConfig, DEFAULT_DATABASE_PATH};

use crate::args::{Cli, Command};

/// Store file used by `bakery demo` when `--db` is not given.
pub const DEMO_DATABASE_PATH: &str = "demo_bakery.db";

/// Settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub verbosity: u8,
    pub command: Command,
}

impl AppConfig {
    /// Folds parsed arguments and defaults together.
    pub fn from_cli(cli: Cli) -> Self {
        let command = cli.command.unwrap_or(Command::Shell);
        let database_path = cli.db.unwrap_or_else(|| match command {
            Command::Demo => PathBuf::from(DEMO_DATABASE_PATH),
            _ => PathBuf::from(DEFAULT_DATABASE_PATH),
        });

        AppConfig {
            database_path,
            verbosity: cli.verbose,
            command,
        }
    }

    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        match self.verbosity {
            0 => "warn",
            1 => "info,sqlx=warn",
            _ => "debug,sqlx=info",
        }
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::ReportArgs;
    use clap::Parser;

    fn config(args: &[&str]) -> AppConfig {
        AppConfig::from_cli(Cli::parse_from(args))
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&["bakery"]);
        assert_eq!(cfg.command, Command::Shell);
        assert_eq!(cfg.database_path, PathBuf::from("bakery.db"));
        assert_eq!(cfg.default_log_filter(), "warn");
    }

    #[test]
    fn test_demo_uses_its_own_store() {
        assert_eq!(config(&["bakery", "demo"]).database_path, PathBuf::from("demo_bakery.db"));
        assert_eq!(
            config(&["bakery", "--db", "x.db", "demo"]).database_path,
            PathBuf::from("x.db")
        );
    }

    #[test]
    fn test_verbosity_raises_log_level() {
        let cfg = config(&["bakery", "-v", "report"]);
        assert_eq!(cfg.command, Command::Report(ReportArgs { json: false }));
        assert_eq!(cfg.default_log_filter(), "info,sqlx=warn");
        assert_eq!(config(&["bakery", "-vvv"]).default_log_filter(), "debug,sqlx=info");
    }
}

//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "bakery")]
#[command(version, about = "Orders, customers, products and stock for a small bakery")]
pub struct Cli {
    /// SQLite store to open (created if missing).
    /// Defaults to bakery.db, or demo_bakery.db for `demo`.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Interactive menu (the default).
    Shell,
    /// Populate a store with sample data and print statistics.
    Demo,
    /// Print the sales summary and exit.
    Report(ReportArgs),
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct ReportArgs {
    /// Emit JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::parse_from(["bakery"]);
        assert_eq!(cli.command, None);
        assert_eq!(cli.db, None);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_report_json_with_db_and_verbosity() {
        let cli = Cli::parse_from(["bakery", "-vv", "report", "--json", "--db", "shop.db"]);
        assert_eq!(cli.command, Some(Command::Report(ReportArgs { json: true })));
        assert_eq!(cli.db, Some(PathBuf::from("shop.db")));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["bakery", "bake"]).is_err());
    }
}

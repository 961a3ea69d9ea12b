//! # Bakery CLI Library
//!
//! Everything behind the `bakery` binary. `main.rs` only parses arguments,
//! sets up logging and calls [`run`].
//!
//! ## Module Organization
//! ```text
//! bakery_cli/
//! ├── lib.rs          ◄─── You are here (store setup & dispatch)
//! ├── args.rs         ◄─── clap definitions
//! ├── config.rs       ◄─── AppConfig resolved from the arguments
//! ├── error.rs        ◄─── InputError / CliError
//! ├── shell/          ◄─── Interactive menus, one file per entity
//! ├── demo.rs         ◄─── `bakery demo`
//! └── report.rs       ◄─── `bakery report` and the shell's sales summary
//! ```
//!
//! ## Startup Sequence
//! ```text
//! AppConfig ──► Database::new (connect + migrate) ──► command ──► close
//! ```

pub mod args;
pub mod config;
pub mod demo;
pub mod error;
pub mod report;
pub mod shell;

use std::io;

use bakery_db::Database;
use tracing::info;

use args::Command;
use config::AppConfig;
use error::CliResult;
use shell::Shell;

/// Opens the store named by `config` and runs the requested command.
///
/// The shell talks to the terminal; `demo` and `report` write to stdout.
pub async fn run(config: &AppConfig) -> CliResult<()> {
    let db = Database::new(config.db_config()).await?;
    info!(path = %config.database_path.display(), "Store opened");

    let result = match &config.command {
        Command::Shell => {
            let stdin = io::stdin();
            let mut shell = Shell::new(db.clone(), stdin.lock(), io::stdout());
            shell.run().await
        }
        Command::Demo => demo::run(&db, &mut io::stdout().lock()).await,
        Command::Report(args) => report::run(&db, args.json, &mut io::stdout().lock()).await,
    };

    db.close().await;
    result
}

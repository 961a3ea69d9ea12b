//! # Interactive Shell
//!
//! Numeric menus over the repositories.
//!
//! ## Menu Tree
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Bakery Manager                                                         │
//! │  ├── 1. Products    list, add, update, delete                          │
//! │  ├── 2. Customers   list, add, update, delete                          │
//! │  ├── 3. Orders      list, create, details, status, delete              │
//! │  ├── 4. Stock       list, add, set quantity, low stock, delete         │
//! │  ├── 5. Reports     orders by status, sales summary                    │
//! │  └── 0. Quit                                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Error Handling
//! Each action runs to completion or fails with a `CliError`. Recoverable
//! errors (bad input, missing entities, validation and referential failures)
//! are printed and the current menu is shown again. End of input leaves the
//! shell cleanly from any depth. Anything else ends the session.
//!
//! The shell reads from any `BufRead` and writes to any `Write`, so tests
//! drive it with a scripted `Cursor` and capture the output in a `Vec<u8>`.

use std::io::{BufRead, Write};
use std::str::FromStr;

use bakery_core::{EntityId, Money};
use bakery_db::Database;
use chrono::{DateTime, Local, Utc};
use tracing::{debug, info};

use crate::error::{CliError, CliResult, InputError};

mod customers;
mod orders;
mod products;
mod reports;
mod stock;

/// A menu session bound to one store.
pub struct Shell<R, W> {
    db: Database,
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(db: Database, input: R, out: W) -> Self {
        Shell { db, input, out }
    }

    /// Gives back the output sink (tests read what was printed).
    pub fn into_output(self) -> W {
        self.out
    }

    /// Runs the main menu until `0`, end of input, or a fatal error.
    pub async fn run(&mut self) -> CliResult<()> {
        info!("Shell started");

        loop {
            self.menu(
                "Bakery Manager",
                &["Products", "Customers", "Orders", "Stock", "Reports"],
                "Quit",
            )?;

            let result = match self.prompt("Choose an option") {
                Ok(choice) => match choice.as_str() {
                    "1" => self.products_menu().await,
                    "2" => self.customers_menu().await,
                    "3" => self.orders_menu().await,
                    "4" => self.stock_menu().await,
                    "5" => self.reports_menu().await,
                    "0" => break,
                    _ => Err(InputError::UnknownChoice { input: choice.clone() }.into()),
                },
                Err(err) => Err(err),
            };

            match self.recover(result) {
                Ok(()) => {}
                Err(err) if err.is_end_of_input() => break,
                Err(err) => return Err(err),
            }
        }

        writeln!(self.out, "Goodbye!")?;
        info!("Shell finished");
        Ok(())
    }

    // =========================================================================
    // Menu Plumbing
    // =========================================================================

    fn menu(&mut self, title: &str, items: &[&str], zero: &str) -> CliResult<()> {
        writeln!(self.out)?;
        writeln!(self.out, "=== {title} ===")?;
        for (n, item) in items.iter().enumerate() {
            writeln!(self.out, "{}. {item}", n + 1)?;
        }
        writeln!(self.out, "0. {zero}")?;
        Ok(())
    }

    /// Prints a recoverable error and swallows it; passes everything else on.
    fn recover(&mut self, result: CliResult<()>) -> CliResult<()> {
        match result {
            Err(err) if err.is_recoverable() => {
                debug!(error = %err, "Recovered from action error");
                writeln!(self.out, "Error: {err}")?;
                Ok(())
            }
            other => other,
        }
    }

    // =========================================================================
    // Prompts
    // =========================================================================

    /// Reads one trimmed line. End of input is an `InputError::EndOfInput`.
    fn prompt(&mut self, label: &str) -> CliResult<String> {
        write!(self.out, "{label}: ")?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(InputError::EndOfInput.into());
        }
        Ok(line.trim().to_string())
    }

    fn prompt_required(&mut self, label: &str, field: &str) -> CliResult<String> {
        let value = self.prompt(label)?;
        if value.is_empty() {
            return Err(InputError::Required {
                field: field.to_string(),
            }
            .into());
        }
        Ok(value)
    }

    /// Empty input means "none".
    fn prompt_optional(&mut self, label: &str) -> CliResult<Option<String>> {
        let value = self.prompt(label)?;
        Ok((!value.is_empty()).then_some(value))
    }

    fn prompt_number<T: FromStr>(&mut self, label: &str) -> CliResult<T> {
        let text = self.prompt(label)?;
        Ok(parse_number(&text)?)
    }

    fn prompt_id(&mut self, label: &str) -> CliResult<EntityId> {
        self.prompt_number(label)
    }

    fn prompt_money(&mut self, label: &str) -> CliResult<Money> {
        let text = self.prompt(label)?;
        Ok(text.parse::<Money>()?)
    }

    /// "Enter keeps the current value": shows it in brackets, returns `None`
    /// when the user just presses Enter.
    fn prompt_keep(&mut self, label: &str, current: &str) -> CliResult<Option<String>> {
        let value = self.prompt(&format!("{label} [{current}]"))?;
        Ok((!value.is_empty()).then_some(value))
    }

    fn confirm(&mut self, question: &str) -> CliResult<bool> {
        let answer = self.prompt(&format!("{question} (y/n)"))?;
        Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes" | "s" | "sim"))
    }
}

// =============================================================================
// Formatting Helpers
// =============================================================================

pub(crate) fn parse_number<T: FromStr>(text: &str) -> Result<T, InputError> {
    text.trim().parse().map_err(|_| InputError::NotANumber {
        input: text.to_string(),
    })
}

/// Local wall-clock time, minute precision.
pub(crate) fn fmt_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Stock amounts without a trailing `.0` for whole numbers.
pub(crate) fn fmt_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{amount:.0}")
    } else {
        format!("{amount}")
    }
}

/// Converts the `Ok(false)` of update/delete into a "not found" error.
fn found(hit: bool, entity: &'static str, id: EntityId) -> CliResult<()> {
    if hit {
        Ok(())
    } else {
        Err(CliError::from(InputError::not_found(entity, id)))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use bakery_db::DbConfig;
    use std::io::Cursor;

    pub(crate) async fn memory_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// Runs a whole session over `script` and returns what was printed.
    pub(crate) async fn drive(db: &Database, script: &str) -> String {
        let mut shell = Shell::new(db.clone(), Cursor::new(script.to_string()), Vec::new());
        shell.run().await.unwrap();
        String::from_utf8(shell.into_output()).unwrap()
    }

    #[tokio::test]
    async fn test_quit_from_main_menu() {
        let db = memory_db().await;
        let out = drive(&db, "0\n").await;

        assert!(out.contains("=== Bakery Manager ==="));
        assert!(out.contains("0. Quit"));
        assert!(out.ends_with("Goodbye!\n"));
    }

    #[tokio::test]
    async fn test_end_of_input_quits_from_a_submenu() {
        let db = memory_db().await;
        let out = drive(&db, "1\n2\nBrownie\n").await;

        assert!(out.contains("=== Products ==="));
        assert!(out.ends_with("Goodbye!\n"));
        assert_eq!(db.products().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_option_is_reported() {
        let db = memory_db().await;
        let out = drive(&db, "9\nabc\n0\n").await;

        assert!(out.contains("Error: invalid option: '9'"));
        assert!(out.contains("Error: invalid option: 'abc'"));
    }

    #[tokio::test]
    async fn test_closed_store_is_fatal() {
        let db = memory_db().await;
        db.close().await;

        let mut shell = Shell::new(db, Cursor::new("1\n1\n0\n0\n".to_string()), Vec::new());
        let err = shell.run().await.unwrap_err();
        assert!(matches!(err, CliError::Db(_)));
    }

    #[test]
    fn test_formatting_helpers() {
        assert_eq!(fmt_amount(50.0), "50");
        assert_eq!(fmt_amount(2.5), "2.5");
        assert_eq!(parse_number::<i64>(" 12 ").unwrap(), 12);
        assert!(parse_number::<i64>("twelve").is_err());
        assert!(found(true, "Product", 1).is_ok());
        assert!(found(false, "Product", 1).unwrap_err().is_recoverable());
    }
}

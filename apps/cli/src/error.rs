//! # CLI Error Types
//!
//! ## What Ends a Session
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CliError                                                               │
//! │  ├── Input(InputError)                                                 │
//! │  │     ├── EndOfInput          → shell quits cleanly (exit 0)          │
//! │  │     └── everything else     → message, back to the menu             │
//! │  ├── Db(DbError)                                                       │
//! │  │     ├── recoverable         → message, back to the menu             │
//! │  │     └── fatal               → logged, exit code 1                   │
//! │  ├── Io                        → exit code 1                           │
//! │  └── Json                      → exit code 1                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bakery_core::{CoreError, EntityId};
use bakery_db::DbError;
use thiserror::Error;

/// Problems with what the user typed.
#[derive(Debug, Error)]
pub enum InputError {
    /// Input stream closed (Ctrl-D, or the end of a piped script).
    #[error("end of input")]
    EndOfInput,

    #[error("'{input}' is not a valid number")]
    NotANumber { input: String },

    #[error("{field} is required")]
    Required { field: String },

    #[error("invalid option: '{input}'")]
    UnknownChoice { input: String },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: &'static str, min: i64, max: i64 },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: EntityId },

    /// Amounts and statuses rejected by the domain parsers.
    #[error(transparent)]
    Invalid(#[from] CoreError),
}

impl InputError {
    pub fn not_found(entity: &'static str, id: EntityId) -> Self {
        InputError::NotFound { entity, id }
    }
}

/// Top-level error for everything the `bakery` binary does.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// True when the shell should print the message and carry on.
    pub fn is_recoverable(&self) -> bool {
        match self {
            CliError::Input(InputError::EndOfInput) => false,
            CliError::Input(_) => true,
            CliError::Db(err) => err.is_recoverable(),
            CliError::Io(_) | CliError::Json(_) => false,
        }
    }

    pub fn is_end_of_input(&self) -> bool {
        matches!(self, CliError::Input(InputError::EndOfInput))
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::Input(InputError::Invalid(err))
    }
}

pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(CliError::from(InputError::NotANumber { input: "abc".into() }).is_recoverable());
        assert!(CliError::from(InputError::not_found("Product", 9)).is_recoverable());
        assert!(CliError::from(DbError::missing_reference("product 9 does not exist")).is_recoverable());

        assert!(!CliError::from(InputError::EndOfInput).is_recoverable());
        assert!(CliError::from(InputError::EndOfInput).is_end_of_input());
        assert!(!CliError::from(DbError::PoolExhausted).is_recoverable());
    }

    #[test]
    fn test_messages() {
        assert_eq!(InputError::not_found("Order", 4).to_string(), "Order 4 not found");
        assert_eq!(
            InputError::NotANumber { input: "x".into() }.to_string(),
            "'x' is not a valid number"
        );
    }
}

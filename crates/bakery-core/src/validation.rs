//! # Validation Module
//!
//! Field rules checked before an entity is written.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Shell (bakery-cli)                                           │
//! │  ├── Parsing: ids, quantities, prices                                  │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (called from entity `validate()`)                │
//! │  ├── Required text fields                                              │
//! │  └── Numeric ranges                                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bakery_core::validation::{validate_phone, validate_quantity};
//!
//! assert!(validate_phone("11999999999").is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_LINE_QUANTITY, MAX_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted name (products, customers, stock items).
pub const MAX_NAME_LEN: usize = 200;

/// Longest accepted free-text field (descriptions, notes, addresses).
pub const MAX_TEXT_LEN: usize = 1_000;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required, length-bounded text field.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most `max` characters
pub fn validate_required(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates an optional free-text field (only the length is checked).
pub fn validate_optional_text(field: &str, value: Option<&str>) -> ValidationResult<()> {
    match value {
        Some(text) if text.chars().count() > MAX_TEXT_LEN => Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LEN,
        }),
        _ => Ok(()),
    }
}

/// Validates a display name.
///
/// ## Example
/// ```rust
/// use bakery_core::validation::validate_name;
///
/// assert!(validate_name("Bolo de Chocolate").is_ok());
/// assert!(validate_name("").is_err());
/// ```
pub fn validate_name(name: &str) -> ValidationResult<()> {
    validate_required("name", name, MAX_NAME_LEN)
}

/// Validates a customer phone number.
///
/// ## Rules
/// - Required
/// - Digits plus the usual separators: space, `+`, `-`, `(`, `)`, `.`
/// - At least one digit
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    validate_required("phone", phone, 40)?;

    let phone = phone.trim();
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')' | '.');

    if !phone.chars().all(allowed) || !phone.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain digits and only + - ( ) . or spaces".to_string(),
        });
    }

    Ok(())
}

/// Validates an optional email address.
///
/// ## Rules
/// - `None` is fine
/// - Otherwise exactly one `@` with text on both sides and no whitespace
pub fn validate_email(email: Option<&str>) -> ValidationResult<()> {
    let Some(email) = email else {
        return Ok(());
    };

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must look like name@domain".to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(invalid()),
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY
///
/// ## User Workflow
/// ```text
/// Order: Add Line
///      │
///      ▼
/// User enters quantity: 50
///      │
///      ▼
/// validate_quantity(50) ← THIS FUNCTION
///      │
///      ├── qty <= 0?      → "quantity must be positive"
///      ├── qty > 9999?    → "quantity must be between 1 and 9999"
///      └── OK → line is added to the order
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price. Zero is allowed (complimentary items); anything above
/// `MAX_PRICE_CENTS` is not.
///
/// ## Example
/// ```rust
/// use bakery_core::money::Money;
/// use bakery_core::validation::validate_price;
///
/// assert!(validate_price("price", Money::from_cents(5000)).is_ok());
/// assert!(validate_price("price", Money::zero()).is_ok());
/// assert!(validate_price("price", Money::from_cents(-100)).is_err());
/// assert!(validate_price("price", Money::from_cents(i64::MAX)).is_err());
/// ```
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    if price.cents() > MAX_PRICE_CENTS {
        return Err(ValidationError::AboveMaximum {
            field: field.to_string(),
            max: Money::from_cents(MAX_PRICE_CENTS),
        });
    }

    Ok(())
}

/// Validates a preparation time in minutes.
pub fn validate_prep_minutes(minutes: i64) -> ValidationResult<()> {
    if minutes < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "preparation time".to_string(),
        });
    }

    Ok(())
}

/// Validates a stock amount.
///
/// Negative stock is allowed; NaN and infinities are not.
pub fn validate_stock_amount(field: &str, amount: f64) -> ValidationResult<()> {
    if !amount.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a finite number".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Domain Types
//!
//! The entities of the bakery and their derived values.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Customer     │◄──│      Order      │──►│   OrderLine     │ 1..N  │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  name, phone    │   │  customer_id    │   │  product_id ────┼──┐    │
//! │  │  email?         │   │  placed_at      │   │  quantity       │  │    │
//! │  │  address?       │   │  deliver_at     │   │  unit_price     │  │    │
//! │  └─────────────────┘   │  status, notes? │   │  subtotal()     │  │    │
//! │                        │  total()        │   └─────────────────┘  │    │
//! │                        └─────────────────┘                        │    │
//! │  ┌─────────────────┐   ┌─────────────────┐                        │    │
//! │  │   StockItem     │   │    Product      │◄───────────────────────┘    │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  quantity       │   │  price          │                             │
//! │  │  minimum        │   │  prep_minutes   │                             │
//! │  │  needs_restock()│   └─────────────────┘                             │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity carries `id: Option<EntityId>`. Entities are built with
//! `None`; the store assigns the id on insert and returns it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, ValidationError};
use crate::money::Money;
use crate::validation::{
    validate_email, validate_name, validate_optional_text, validate_phone, validate_prep_minutes,
    validate_price, validate_quantity, validate_required, validate_stock_amount, ValidationResult,
    MAX_NAME_LEN,
};

/// Store-assigned surrogate key.
pub type EntityId = i64;

// =============================================================================
// Product
// =============================================================================

/// Something the bakery makes and sells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: Option<EntityId>,

    /// Display name shown in menus and order details.
    pub name: String,

    pub description: String,

    /// Current selling price. Order lines copy it at order time.
    pub price: Money,

    /// Preparation time in minutes.
    pub prep_minutes: i64,
}

impl Product {
    /// Builds an unsaved product.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Money,
        prep_minutes: i64,
    ) -> Self {
        Product {
            id: None,
            name: name.into(),
            description: description.into(),
            price,
            prep_minutes,
        }
    }

    /// Checks the field rules.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name(&self.name)?;
        validate_optional_text("description", Some(&self.description))?;
        validate_price("price", self.price)?;
        validate_prep_minutes(self.prep_minutes)
    }
}

// =============================================================================
// Customer
// =============================================================================

/// Someone who places orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Option<EntityId>,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl Customer {
    /// Builds an unsaved customer with no email or address.
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Customer {
            id: None,
            name: name.into(),
            phone: phone.into(),
            email: None,
            address: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Checks the field rules.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name(&self.name)?;
        validate_phone(&self.phone)?;
        validate_email(self.email.as_deref())?;
        validate_optional_text("address", self.address.as_deref())
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Where an order is in its life.
///
/// Any status may be set from any other; no transitions are enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Taken, not started.
    Pending,
    /// Being baked.
    InProduction,
    /// Waiting for pickup or delivery.
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// All statuses in lifecycle order (also the report order).
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::InProduction,
        OrderStatus::Ready,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Stored form, e.g. `in_production`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::InProduction => "in_production",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Human label for menus, e.g. `In production`.
    pub const fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::InProduction => "In production",
            OrderStatus::Ready => "Ready",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::UnknownStatus(s.to_string()))
    }
}

// =============================================================================
// Order Line
// =============================================================================

/// One product on an order.
///
/// Uses the snapshot pattern: `unit_price` is the product's price when the
/// line was built, so old orders keep their value after a price change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: Option<EntityId>,

    /// Owning order; `None` until the order is stored.
    pub order_id: Option<EntityId>,

    pub product_id: EntityId,
    pub quantity: i64,

    /// Unit price at order time (frozen).
    pub unit_price: Money,

    pub notes: Option<String>,
}

impl OrderLine {
    /// Builds an unsaved line with an explicit unit price.
    pub fn new(product_id: EntityId, quantity: i64, unit_price: Money, notes: Option<String>) -> Self {
        OrderLine {
            id: None,
            order_id: None,
            product_id,
            quantity,
            unit_price,
            notes,
        }
    }

    /// Builds a line for a stored product, copying its current price.
    ///
    /// Fails if the product has not been stored yet (no id to reference).
    pub fn for_product(
        product: &Product,
        quantity: i64,
        notes: Option<String>,
    ) -> ValidationResult<Self> {
        let product_id = product.id.ok_or_else(|| ValidationError::Required {
            field: "product id".to_string(),
        })?;

        Ok(OrderLine::new(product_id, quantity, product.price, notes))
    }

    /// `quantity × unit_price`.
    #[inline]
    pub fn subtotal(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// Checks the field rules.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_quantity(self.quantity)?;
        validate_price("unit price", self.unit_price)?;
        validate_optional_text("line notes", self.notes.as_deref())
    }
}

// =============================================================================
// Order
// =============================================================================

/// A customer's order with the lines it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: Option<EntityId>,
    pub customer_id: EntityId,
    pub placed_at: DateTime<Utc>,
    pub deliver_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub lines: Vec<OrderLine>,
}

impl Order {
    /// Builds an unsaved, pending order with no lines.
    pub fn new(customer_id: EntityId, placed_at: DateTime<Utc>, deliver_at: DateTime<Utc>) -> Self {
        Order {
            id: None,
            customer_id,
            placed_at,
            deliver_at,
            status: OrderStatus::Pending,
            notes: None,
            lines: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Appends a line.
    pub fn add_line(&mut self, line: OrderLine) {
        self.lines.push(line);
    }

    /// Sum of the line subtotals; zero for an order without lines.
    pub fn total(&self) -> Money {
        self.lines.iter().map(OrderLine::subtotal).sum()
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Checks the order fields and every line.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_optional_text("notes", self.notes.as_deref())?;
        self.lines.iter().try_for_each(OrderLine::validate)
    }
}

// =============================================================================
// Stock Item
// =============================================================================

/// An ingredient or supply the bakery keeps on hand.
///
/// Quantities are adjusted by hand; orders never consume stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    pub id: Option<EntityId>,
    pub name: String,

    /// Unit of measure, free text ("kg", "dozen").
    pub unit: String,

    /// Current amount on hand. May be negative.
    pub quantity: f64,

    /// Restock threshold.
    pub minimum: f64,
}

impl StockItem {
    /// Builds an unsaved stock item.
    pub fn new(name: impl Into<String>, unit: impl Into<String>, quantity: f64, minimum: f64) -> Self {
        StockItem {
            id: None,
            name: name.into(),
            unit: unit.into(),
            quantity,
            minimum,
        }
    }

    /// True when the amount on hand is at or below the threshold.
    #[inline]
    pub fn needs_restock(&self) -> bool {
        self.quantity <= self.minimum
    }

    /// Checks the field rules.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name(&self.name)?;
        validate_required("unit", &self.unit, MAX_NAME_LEN)?;
        validate_stock_amount("quantity", self.quantity)?;
        validate_stock_amount("minimum", self.minimum)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_subtotal_is_quantity_times_unit_price() {
        let line = OrderLine::new(1, 3, Money::from_cents(5000), None);
        assert_eq!(line.subtotal(), Money::from_cents(15000));
    }

    #[test]
    fn test_total_sums_subtotals() {
        let mut order = Order::new(1, at(1, 9), at(3, 9));
        order.add_line(OrderLine::new(1, 2, Money::from_cents(5000), None));
        order.add_line(OrderLine::new(2, 1, Money::from_cents(3000), None));

        assert_eq!(order.total(), Money::from_cents(13000));
        assert_eq!(order.item_count(), 3);
    }

    #[test]
    fn test_empty_order_total_is_zero() {
        let order = Order::new(1, at(1, 9), at(3, 9));
        assert!(order.total().is_zero());
    }

    #[test]
    fn test_needs_restock_boundary_is_inclusive() {
        assert!(!StockItem::new("Flour", "kg", 10.0, 5.0).needs_restock());
        assert!(StockItem::new("Flour", "kg", 3.0, 5.0).needs_restock());
        assert!(StockItem::new("Flour", "kg", 5.0, 5.0).needs_restock());
        assert!(StockItem::new("Flour", "kg", -1.0, 0.0).needs_restock());
    }

    #[test]
    fn test_price_beyond_ceiling_is_rejected_before_subtotal() {
        use crate::{MAX_LINE_QUANTITY, MAX_PRICE_CENTS};

        let huge: Money = "92233720368547758.07".parse().unwrap();
        assert_eq!(huge.cents(), i64::MAX);

        assert!(Product::new("Gold cake", "", huge, 1).validate().is_err());

        let mut order = Order::new(1, at(1, 9), at(2, 9));
        order.add_line(OrderLine::new(1, 2, huge, None));
        assert!(order.validate().is_err());

        let line = OrderLine::new(1, MAX_LINE_QUANTITY, Money::from_cents(MAX_PRICE_CENTS), None);
        assert!(line.validate().is_ok());
        assert_eq!(line.subtotal().cents(), MAX_PRICE_CENTS * MAX_LINE_QUANTITY);
    }

    #[test]
    fn test_line_for_product_snapshots_price() {
        let mut product = Product::new("Brownie", "Walnut brownie", Money::from_cents(600), 25);
        product.id = Some(7);

        let line = OrderLine::for_product(&product, 4, Some("gift box".into())).unwrap();
        product.price = Money::from_cents(900);

        assert_eq!(line.product_id, 7);
        assert_eq!(line.unit_price, Money::from_cents(600));
        assert_eq!(line.subtotal(), Money::from_cents(2400));
    }

    #[test]
    fn test_line_for_unsaved_product_fails() {
        let product = Product::new("Brownie", "", Money::from_cents(600), 25);
        assert!(OrderLine::for_product(&product, 1, None).is_err());
    }

    #[test]
    fn test_status_text_round_trip() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        assert_eq!("IN_PRODUCTION".parse::<OrderStatus>().unwrap(), OrderStatus::InProduction);
        assert!("shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_status_default_and_serde() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
        let json = serde_json::to_string(&OrderStatus::InProduction).unwrap();
        assert_eq!(json, "\"in_production\"");
    }

    #[test]
    fn test_validate_entities() {
        assert!(Product::new("Cake", "", Money::from_cents(100), 0).validate().is_ok());
        assert!(Product::new("", "", Money::from_cents(100), 0).validate().is_err());
        assert!(Product::new("Cake", "", Money::from_cents(-1), 0).validate().is_err());
        assert!(Product::new("Cake", "", Money::from_cents(100), -1).validate().is_err());

        assert!(Customer::new("Ana", "1197777").validate().is_ok());
        assert!(Customer::new("Ana", "").validate().is_err());
        assert!(Customer::new("Ana", "1197777").with_email("nope").validate().is_err());

        let mut order = Order::new(1, at(1, 9), at(2, 9));
        assert!(order.validate().is_ok());
        order.add_line(OrderLine::new(1, 0, Money::from_cents(100), None));
        assert!(order.validate().is_err());

        assert!(StockItem::new("Eggs", "dozen", 20.0, 5.0).validate().is_ok());
        assert!(StockItem::new("Eggs", " ", 20.0, 5.0).validate().is_err());
        assert!(StockItem::new("Eggs", "dozen", f64::NAN, 5.0).validate().is_err());
    }
}

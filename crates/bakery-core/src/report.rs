//! # Reports
//!
//! Aggregations over the results of repository `list()` calls. Nothing here
//! is stored; every figure is recomputed from the orders and stock passed in.
//!
//! ```text
//! orders.list(None) ──► SalesSummary::from_orders ──► totals, delivered revenue,
//!                                                     best sellers
//! orders.list(None) ──► group_by_status         ──► per-status buckets
//! stock.list()      ──► low_stock               ──► items at/below minimum
//! ```

use std::collections::HashMap;

use serde::Serialize;

use crate::money::Money;
use crate::types::{EntityId, Order, OrderStatus, StockItem};

/// Units sold of one product across the orders summarised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProductSales {
    pub product_id: EntityId,
    pub quantity: i64,
}

/// Headline numbers of the sales summary report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesSummary {
    pub total_orders: usize,
    pub delivered_orders: usize,

    /// Value of every order regardless of status.
    pub total_value: Money,

    /// Value of delivered orders only (realised revenue).
    pub delivered_value: Money,

    /// Best sellers by units, highest first; ties go to the lower product id.
    pub top_products: Vec<ProductSales>,
}

impl SalesSummary {
    /// Builds the summary, keeping at most `top_n` best sellers.
    pub fn from_orders(orders: &[Order], top_n: usize) -> Self {
        let delivered: Vec<&Order> = orders
            .iter()
            .filter(|order| order.status == OrderStatus::Delivered)
            .collect();

        let mut units: HashMap<EntityId, i64> = HashMap::new();
        for line in orders.iter().flat_map(|order| &order.lines) {
            *units.entry(line.product_id).or_default() += line.quantity;
        }

        let mut top_products: Vec<ProductSales> = units
            .into_iter()
            .map(|(product_id, quantity)| ProductSales { product_id, quantity })
            .collect();
        top_products.sort_by(|a, b| {
            b.quantity
                .cmp(&a.quantity)
                .then(a.product_id.cmp(&b.product_id))
        });
        top_products.truncate(top_n);

        SalesSummary {
            total_orders: orders.len(),
            delivered_orders: delivered.len(),
            total_value: orders.iter().map(Order::total).sum(),
            delivered_value: delivered.iter().map(|order| order.total()).sum(),
            top_products,
        }
    }
}

/// Groups orders by status in `OrderStatus::ALL` order.
///
/// Every status gets a bucket, empty or not. Within a bucket the input order
/// is kept, so delivery order survives when the input came from `list()`.
pub fn group_by_status(orders: &[Order]) -> Vec<(OrderStatus, Vec<&Order>)> {
    OrderStatus::ALL
        .into_iter()
        .map(|status| {
            let bucket = orders.iter().filter(|order| order.status == status).collect();
            (status, bucket)
        })
        .collect()
}

/// Stock items at or below their restock threshold, in input order.
pub fn low_stock(items: &[StockItem]) -> Vec<&StockItem> {
    items.iter().filter(|item| item.needs_restock()).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

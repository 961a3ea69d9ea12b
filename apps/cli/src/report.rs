//! # Sales Report
//!
//! The numbers behind `bakery report` and the shell's "Sales summary".
//! Figures come from `bakery_core::report`; this module looks up the
//! product names and renders the result as text or JSON.

use std::collections::HashMap;
use std::io::Write;

use bakery_core::report::{group_by_status, low_stock, SalesSummary};
use bakery_core::{EntityId, Money, OrderStatus, StockItem, DEFAULT_TOP_PRODUCTS};
use bakery_db::Database;
use serde::Serialize;
use tracing::debug;

use crate::error::CliResult;
use crate::shell::fmt_amount;

/// A best seller with its name resolved.
#[derive(Debug, Clone, Serialize)]
pub struct TopProduct {
    pub product_id: EntityId,
    pub name: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: usize,
}

/// Everything the report prints. Money fields serialize as cents.
#[derive(Debug, Clone, Serialize)]
pub struct SalesReport {
    pub total_orders: usize,
    pub delivered_orders: usize,
    pub total_value: Money,
    pub delivered_value: Money,
    pub top_products: Vec<TopProduct>,
    pub orders_by_status: Vec<StatusCount>,
    pub low_stock: Vec<StockItem>,
}

impl SalesReport {
    /// Reads orders, products and stock and aggregates them.
    pub async fn build(db: &Database) -> CliResult<Self> {
        let orders = db.orders().list(None).await?;
        let names: HashMap<EntityId, String> = db
            .products()
            .list()
            .await?
            .into_iter()
            .filter_map(|p| p.id.map(|id| (id, p.name)))
            .collect();
        let stock = db.stock().list().await?;

        let summary = SalesSummary::from_orders(&orders, DEFAULT_TOP_PRODUCTS);
        debug!(orders = summary.total_orders, "Built sales summary");

        let top_products = summary
            .top_products
            .iter()
            .map(|sales| TopProduct {
                product_id: sales.product_id,
                name: names
                    .get(&sales.product_id)
                    .cloned()
                    .unwrap_or_else(|| format!("product {}", sales.product_id)),
                quantity: sales.quantity,
            })
            .collect();

        let orders_by_status = group_by_status(&orders)
            .into_iter()
            .map(|(status, bucket)| StatusCount {
                status,
                count: bucket.len(),
            })
            .collect();

        Ok(SalesReport {
            total_orders: summary.total_orders,
            delivered_orders: summary.delivered_orders,
            total_value: summary.total_value,
            delivered_value: summary.delivered_value,
            top_products,
            orders_by_status,
            low_stock: low_stock(&stock).into_iter().cloned().collect(),
        })
    }

    /// The summary block: totals, delivered revenue and best sellers.
    pub fn write_summary(&self, out: &mut impl Write) -> std::io::Result<()> {
        writeln!(out, "Orders:            {}", self.total_orders)?;
        writeln!(out, "Total value:       {}", self.total_value)?;
        writeln!(out, "Delivered orders:  {}", self.delivered_orders)?;
        writeln!(out, "Delivered revenue: {}", self.delivered_value)?;

        if self.top_products.is_empty() {
            writeln!(out, "No products sold yet.")?;
            return Ok(());
        }
        writeln!(out, "Top products:")?;
        for (rank, product) in self.top_products.iter().enumerate() {
            writeln!(out, "  {}. {:<30} {:>6}", rank + 1, product.name, product.quantity)?;
        }
        Ok(())
    }

    /// Full text rendering for `bakery report`.
    pub fn write_text(&self, out: &mut impl Write) -> std::io::Result<()> {
        writeln!(out, "=== Sales Summary ===")?;
        self.write_summary(out)?;

        writeln!(out)?;
        writeln!(out, "Orders by status:")?;
        for entry in &self.orders_by_status {
            writeln!(out, "  {:<14} {:>4}", entry.status.label(), entry.count)?;
        }

        writeln!(out)?;
        if self.low_stock.is_empty() {
            writeln!(out, "All stock items are above their minimum.")?;
        } else {
            writeln!(out, "Low stock:")?;
            for item in &self.low_stock {
                writeln!(
                    out,
                    "  {:<30} {} {} (min {})",
                    item.name,
                    fmt_amount(item.quantity),
                    item.unit,
                    fmt_amount(item.minimum)
                )?;
            }
        }
        Ok(())
    }
}

/// `bakery report`: prints the report as text, or as pretty JSON.
pub async fn run(db: &Database, json: bool, out: &mut impl Write) -> CliResult<()> {
    let report = SalesReport::build(db).await?;
    if json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    } else {
        report.write_text(out)?;
    }
    Ok(())
}

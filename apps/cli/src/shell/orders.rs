//! Orders menu.
//!
//! ## Create Order Dialog
//! ```text
//! Customer ID ──► days until delivery ──► notes
//!      │
//!      ▼
//! ┌──────────────────────────────────────────┐
//! │  Product ID (0 to finish) ──► Quantity   │ ◄─┐  bad id / quantity:
//! │       │                       ──► Notes  │   │  message, ask again
//! │       ▼                                  │   │
//! │  line added (price copied from product)  │ ──┘
//! └──────────────────────────────────────────┘
//!      │ 0
//!      ▼
//! no lines? ──► discarded      otherwise ──► one transactional insert
//! ```

use std::collections::HashMap;
use std::io::{BufRead, Write};

use bakery_core::{EntityId, Order, OrderLine, OrderStatus};
use chrono::{Duration, Utc};
use tracing::debug;

use super::{fmt_time, found, parse_number, Shell};
use crate::error::{CliResult, InputError};

/// Longest accepted lead time for a new order.
const MAX_DAYS_AHEAD: i64 = 365;

impl<R: BufRead, W: Write> Shell<R, W> {
    pub(super) async fn orders_menu(&mut self) -> CliResult<()> {
        loop {
            self.menu(
                "Orders",
                &["List orders", "Create order", "Order details", "Update status", "Delete order"],
                "Back",
            )?;

            let choice = self.prompt("Choose an option")?;
            let result = match choice.as_str() {
                "1" => self.list_orders().await,
                "2" => self.create_order().await,
                "3" => self.order_details().await,
                "4" => self.update_order_status().await,
                "5" => self.delete_order().await,
                "0" => return Ok(()),
                _ => Err(InputError::UnknownChoice { input: choice.clone() }.into()),
            };
            self.recover(result)?;
        }
    }

    /// Prints the five statuses as a numbered list.
    fn print_statuses(&mut self) -> CliResult<()> {
        for (n, status) in OrderStatus::ALL.iter().enumerate() {
            writeln!(self.out, "  {}. {}", n + 1, status.label())?;
        }
        Ok(())
    }

    pub(super) async fn customer_names(&self) -> CliResult<HashMap<EntityId, String>> {
        let customers = self.db.customers().list().await?;
        Ok(customers
            .into_iter()
            .filter_map(|c| c.id.map(|id| (id, c.name)))
            .collect())
    }

    async fn list_orders(&mut self) -> CliResult<()> {
        writeln!(self.out, "Filter by status (Enter for all):")?;
        self.print_statuses()?;
        let choice = self.prompt("Status")?;
        let filter = if choice.is_empty() {
            None
        } else {
            Some(pick_status(&choice)?)
        };

        let orders = self.db.orders().list(filter).await?;
        if orders.is_empty() {
            writeln!(self.out, "No orders found.")?;
            return Ok(());
        }

        let names = self.customer_names().await?;
        self.print_order_rows(&orders, &names)
    }

    pub(super) fn print_order_rows<'o>(
        &mut self,
        orders: impl IntoIterator<Item = &'o Order>,
        names: &HashMap<EntityId, String>,
    ) -> CliResult<()> {
        for order in orders {
            let customer = names.get(&order.customer_id).map(String::as_str).unwrap_or("?");
            writeln!(
                self.out,
                "#{:<4} {}  {:<14} {:<24} {:>10}",
                order.id.unwrap_or_default(),
                fmt_time(order.deliver_at),
                order.status.label(),
                customer,
                order.total().to_string()
            )?;
        }
        Ok(())
    }

    async fn create_order(&mut self) -> CliResult<()> {
        self.list_customers().await?;
        let customer_id = self.prompt_id("Customer ID")?;
        let Some(customer) = self.db.customers().get(customer_id).await? else {
            return Err(InputError::not_found("Customer", customer_id).into());
        };

        let days: i64 = self.prompt_number("Days until delivery")?;
        if !(0..=MAX_DAYS_AHEAD).contains(&days) {
            return Err(InputError::OutOfRange {
                field: "days until delivery",
                min: 0,
                max: MAX_DAYS_AHEAD,
            }
            .into());
        }
        let notes = self.prompt_optional("Notes (optional)")?;

        let placed_at = Utc::now();
        let mut order = Order::new(customer_id, placed_at, placed_at + Duration::days(days));
        order.notes = notes;

        let products = self.db.products().list().await?;
        writeln!(self.out, "Products:")?;
        for product in &products {
            writeln!(
                self.out,
                "{:>4}  {:<30} {:>10}",
                product.id.unwrap_or_default(),
                product.name,
                product.price.to_string()
            )?;
        }

        loop {
            let text = self.prompt("Product ID (0 to finish)")?;
            let product_id: EntityId = match parse_number(&text) {
                Ok(0) => break,
                Ok(id) => id,
                Err(err) => {
                    writeln!(self.out, "Error: {err}")?;
                    continue;
                }
            };
            let Some(product) = products.iter().find(|p| p.id == Some(product_id)) else {
                writeln!(self.out, "Error: {}", InputError::not_found("Product", product_id))?;
                continue;
            };

            let text = self.prompt("Quantity")?;
            let quantity: i64 = match parse_number(&text) {
                Ok(quantity) => quantity,
                Err(err) => {
                    writeln!(self.out, "Error: {err}")?;
                    continue;
                }
            };
            let line_notes = self.prompt_optional("Line notes (optional)")?;

            let line = OrderLine::for_product(product, quantity, line_notes)
                .and_then(|line| line.validate().map(|()| line));
            match line {
                Ok(line) => {
                    writeln!(
                        self.out,
                        "Added {} x {} = {}",
                        line.quantity,
                        product.name,
                        line.subtotal()
                    )?;
                    order.add_line(line);
                }
                Err(err) => writeln!(self.out, "Error: {err}")?,
            }
        }

        if order.lines.is_empty() {
            debug!(customer_id, "Order without lines discarded");
            writeln!(self.out, "Order has no items and was discarded.")?;
            return Ok(());
        }

        let id = self.db.orders().create(&order).await?;
        writeln!(
            self.out,
            "Order #{id} created for {}. Total: {}",
            customer.name,
            order.total()
        )?;
        Ok(())
    }

    async fn order_details(&mut self) -> CliResult<()> {
        let id = self.prompt_id("Order ID")?;
        let Some(order) = self.db.orders().get(id).await? else {
            return Err(InputError::not_found("Order", id).into());
        };

        let customer = match self.db.customers().get(order.customer_id).await? {
            Some(customer) => format!("{} ({})", customer.name, customer.phone),
            None => format!("customer {}", order.customer_id),
        };

        writeln!(self.out, "Order #{id}")?;
        writeln!(self.out, "  Customer:  {customer}")?;
        writeln!(self.out, "  Placed:    {}", fmt_time(order.placed_at))?;
        writeln!(self.out, "  Delivery:  {}", fmt_time(order.deliver_at))?;
        writeln!(self.out, "  Status:    {}", order.status.label())?;
        if let Some(notes) = &order.notes {
            writeln!(self.out, "  Notes:     {notes}")?;
        }
        writeln!(self.out, "  Items:")?;
        for line in &order.lines {
            let name = match self.db.products().get(line.product_id).await? {
                Some(product) => product.name,
                None => format!("product {}", line.product_id),
            };
            writeln!(
                self.out,
                "    {} x {} @ {} = {}",
                line.quantity,
                name,
                line.unit_price,
                line.subtotal()
            )?;
            if let Some(notes) = &line.notes {
                writeln!(self.out, "      ({notes})")?;
            }
        }
        writeln!(self.out, "  Total:     {}", order.total())?;
        Ok(())
    }

    async fn update_order_status(&mut self) -> CliResult<()> {
        let id = self.prompt_id("Order ID")?;
        let Some(order) = self.db.orders().get(id).await? else {
            return Err(InputError::not_found("Order", id).into());
        };

        writeln!(self.out, "Current status: {}", order.status.label())?;
        self.print_statuses()?;
        let choice = self.prompt("New status")?;
        let status = pick_status(&choice)?;

        found(self.db.orders().update_status(id, status).await?, "Order", id)?;
        writeln!(self.out, "Order #{id} is now {}.", status.label())?;
        Ok(())
    }

    async fn delete_order(&mut self) -> CliResult<()> {
        let id = self.prompt_id("Order ID")?;
        if self.db.orders().get(id).await?.is_none() {
            return Err(InputError::not_found("Order", id).into());
        }

        if !self.confirm(&format!("Delete order #{id}?"))? {
            writeln!(self.out, "Cancelled.")?;
            return Ok(());
        }

        found(self.db.orders().delete(id).await?, "Order", id)?;
        writeln!(self.out, "Order #{id} deleted.")?;
        Ok(())
    }
}

/// Maps a 1-based menu number onto `OrderStatus::ALL`.
fn pick_status(choice: &str) -> Result<OrderStatus, InputError> {
    let index: usize = parse_number(choice)?;
    index
        .checked_sub(1)
        .and_then(|i| OrderStatus::ALL.get(i).copied())
        .ok_or_else(|| InputError::UnknownChoice {
            input: choice.to_string(),
        })
}

//! Reports menu.

use std::io::{BufRead, Write};

use bakery_core::report::group_by_status;

use super::Shell;
use crate::error::{CliResult, InputError};
use crate::report::SalesReport;

impl<R: BufRead, W: Write> Shell<R, W> {
    pub(super) async fn reports_menu(&mut self) -> CliResult<()> {
        loop {
            self.menu("Reports", &["Orders by status", "Sales summary"], "Back")?;

            let choice = self.prompt("Choose an option")?;
            let result = match choice.as_str() {
                "1" => self.orders_by_status().await,
                "2" => self.sales_summary().await,
                "0" => return Ok(()),
                _ => Err(InputError::UnknownChoice { input: choice.clone() }.into()),
            };
            self.recover(result)?;
        }
    }

    async fn orders_by_status(&mut self) -> CliResult<()> {
        let orders = self.db.orders().list(None).await?;
        let names = self.customer_names().await?;

        for (status, bucket) in group_by_status(&orders) {
            writeln!(self.out, "--- {} ({}) ---", status.label(), bucket.len())?;
            self.print_order_rows(bucket, &names)?;
        }
        Ok(())
    }

    async fn sales_summary(&mut self) -> CliResult<()> {
        let report = SalesReport::build(&self.db).await?;
        report.write_summary(&mut self.out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::shell::tests::{drive, memory_db};
    use bakery_core::{Customer, Money, Order, OrderLine, OrderStatus, Product};
    use chrono::Utc;

    #[tokio::test]
    async fn test_orders_by_status_and_summary() {
        let db = memory_db().await;
        let customer = db.customers().create(&Customer::new("João Santos", "11988888888")).await.unwrap();
        let cupcake = db
            .products()
            .create(&Product::new("Cupcake", "", Money::from_cents(800), 30))
            .await
            .unwrap();
        let mut order = Order::new(customer, Utc::now(), Utc::now()).with_status(OrderStatus::Ready);
        order.add_line(OrderLine::new(cupcake, 12, Money::from_cents(800), None));
        db.orders().create(&order).await.unwrap();

        let out = drive(&db, "5\n1\n2\n0\n0\n").await;

        assert!(out.contains("--- Pending (0) ---"));
        assert!(out.contains("--- Ready (1) ---"));
        assert!(out.contains("João Santos"));
        assert!(out.contains("Total value:       $96.00"));
        assert!(out.contains("Delivered revenue: $0.00"));
        assert!(out.contains("1. Cupcake"));
    }
}

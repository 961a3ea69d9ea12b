//! # Demo Script
//!
//! `bakery demo` fills a store with a small bakery's catalogue, customers,
//! pantry and three open orders, then prints what ended up in it.
//!
//! ```text
//! products ──► customers ──► stock ──► orders (pending, in production, ready)
//!                                            │
//!                                            ▼
//!                         counts, total value, per-status counts, low stock
//! ```

use std::io::Write;

use bakery_core::report::{group_by_status, low_stock};
use bakery_core::{CoreError, Customer, Money, Order, OrderLine, OrderStatus, Product, StockItem};
use bakery_db::Database;
use chrono::{Duration, Utc};
use tracing::info;

use crate::error::CliResult;
use crate::shell::fmt_amount;

/// (name, description, price in cents, preparation minutes)
const PRODUCTS: [(&str, &str, i64, i64); 5] = [
    ("Bolo de Chocolate", "Bolo de chocolate com cobertura", 5000, 120),
    ("Torta de Limão", "Torta de limão siciliano", 4500, 90),
    ("Brigadeiro Gourmet", "Brigadeiro com chocolate belga", 350, 15),
    ("Cupcake Red Velvet", "Cupcake com cobertura cream cheese", 800, 30),
    ("Brownie", "Brownie de chocolate com nozes", 600, 25),
];

/// (name, phone, email, address)
const CUSTOMERS: [(&str, &str, &str, Option<&str>); 3] = [
    ("Maria Silva", "11999999999", "maria@email.com", Some("Rua das Flores, 123")),
    ("João Santos", "11988888888", "joao@email.com", Some("Av. Principal, 456")),
    ("Ana Costa", "11977777777", "ana@email.com", None),
];

/// (name, unit, quantity, minimum)
const STOCK: [(&str, &str, f64, f64); 5] = [
    ("Farinha de Trigo", "kg", 50.0, 10.0),
    ("Açúcar", "kg", 30.0, 8.0),
    ("Chocolate em Pó", "kg", 15.0, 5.0),
    ("Ovos", "dúzia", 20.0, 5.0),
    ("Manteiga", "kg", 8.0, 3.0),
];

/// Seeds `db` and writes a progress log plus the closing statistics to `out`.
pub async fn run(db: &Database, out: &mut impl Write) -> CliResult<()> {
    writeln!(out, "=== Bakery Manager demo ===")?;

    writeln!(out, "\nProducts:")?;
    let mut products = Vec::with_capacity(PRODUCTS.len());
    for (name, description, cents, prep) in PRODUCTS {
        let mut product = Product::new(name, description, Money::from_cents(cents), prep);
        let id = db.products().create(&product).await?;
        product.id = Some(id);
        writeln!(out, "  + {name} (ID {id})")?;
        products.push(product);
    }

    writeln!(out, "\nCustomers:")?;
    let mut customers = Vec::with_capacity(CUSTOMERS.len());
    for (name, phone, email, address) in CUSTOMERS {
        let mut customer = Customer::new(name, phone).with_email(email);
        customer.address = address.map(str::to_string);
        let id = db.customers().create(&customer).await?;
        writeln!(out, "  + {name} (ID {id})")?;
        customers.push(id);
    }

    writeln!(out, "\nStock:")?;
    for (name, unit, quantity, minimum) in STOCK {
        db.stock().create(&StockItem::new(name, unit, quantity, minimum)).await?;
        writeln!(
            out,
            "  + {name}: {} {unit} (minimum {} {unit})",
            fmt_amount(quantity),
            fmt_amount(minimum)
        )?;
    }

    writeln!(out, "\nOrders:")?;
    let now = Utc::now();
    // (customer index, lead time, status, notes, [(product index, quantity, notes)])
    let plans: [(usize, Duration, OrderStatus, Option<&str>, Vec<(usize, i64, Option<&str>)>); 3] = [
        (
            0,
            Duration::days(2),
            OrderStatus::Pending,
            Some("Entrega pela manhã, por favor"),
            vec![(0, 2, None)],
        ),
        (
            1,
            Duration::days(1),
            OrderStatus::InProduction,
            None,
            vec![(2, 50, Some("Embalagem para presente")), (3, 12, None)],
        ),
        (2, Duration::hours(4), OrderStatus::Ready, None, vec![(1, 1, None)]),
    ];

    for (customer, lead, status, notes, lines) in plans {
        let mut order = Order::new(customers[customer], now, now + lead).with_status(status);
        order.notes = notes.map(str::to_string);

        for (product, quantity, line_notes) in lines {
            let line = OrderLine::for_product(&products[product], quantity, line_notes.map(str::to_string))
                .map_err(CoreError::from)?;
            order.add_line(line);
        }

        let id = db.orders().create(&order).await?;
        writeln!(
            out,
            "  + Order #{id} ({}): {} item(s), {}",
            status.label(),
            order.item_count(),
            order.total()
        )?;
    }

    write_statistics(db, out).await?;
    info!("Demo data loaded");
    Ok(())
}

async fn write_statistics(db: &Database, out: &mut impl Write) -> CliResult<()> {
    let orders = db.orders().list(None).await?;
    let stock = db.stock().list().await?;

    writeln!(out, "\nStatistics:")?;
    writeln!(out, "  Products:    {}", db.products().count().await?)?;
    writeln!(out, "  Customers:   {}", db.customers().count().await?)?;
    writeln!(out, "  Orders:      {}", orders.len())?;
    writeln!(out, "  Stock items: {}", stock.len())?;
    let total: Money = orders.iter().map(Order::total).sum();
    writeln!(out, "  Total value: {total}")?;

    writeln!(out, "\n  Orders by status:")?;
    for (status, bucket) in group_by_status(&orders) {
        if !bucket.is_empty() {
            writeln!(out, "    {}: {}", status.label(), bucket.len())?;
        }
    }

    let low = low_stock(&stock);
    if low.is_empty() {
        writeln!(out, "\n  All stock items are above their minimum.")?;
    } else {
        writeln!(out, "\n  Low stock:")?;
        for item in low {
            writeln!(out, "    {}: {} {}", item.name, fmt_amount(item.quantity), item.unit)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bakery_db::DbConfig;

    #[tokio::test]
    async fn test_demo_seeds_the_store() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut out = Vec::new();
        run(&db, &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(db.products().count().await.unwrap(), 5);
        assert_eq!(db.customers().count().await.unwrap(), 3);
        assert_eq!(db.stock().count().await.unwrap(), 5);
        assert_eq!(db.orders().count().await.unwrap(), 3);

        // 2 x 50.00 + 50 x 3.50 + 12 x 8.00 + 1 x 45.00
        assert!(text.contains("Total value: $416.00"));
        assert!(text.contains("Pending: 1"));
        assert!(text.contains("In production: 1"));
        assert!(text.contains("Ready: 1"));
        assert!(!text.contains("Delivered:"));
        assert!(text.contains("All stock items are above their minimum."));

        let ana = db.customers().get(3).await.unwrap().unwrap();
        assert_eq!(ana.address, None);

        let joao = db.orders().list(Some(OrderStatus::InProduction)).await.unwrap();
        assert_eq!(joao[0].lines.len(), 2);
        assert_eq!(joao[0].lines[0].notes.as_deref(), Some("Embalagem para presente"));
    }
}

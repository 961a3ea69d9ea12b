//! Stock menu.

use std::io::{BufRead, Write};

use bakery_core::StockItem;

use super::{fmt_amount, found, Shell};
use crate::error::{CliResult, InputError};

impl<R: BufRead, W: Write> Shell<R, W> {
    pub(super) async fn stock_menu(&mut self) -> CliResult<()> {
        loop {
            self.menu(
                "Stock",
                &["List stock", "Add item", "Set quantity", "Low stock", "Delete item"],
                "Back",
            )?;

            let choice = self.prompt("Choose an option")?;
            let result = match choice.as_str() {
                "1" => self.list_stock().await,
                "2" => self.add_stock_item().await,
                "3" => self.set_stock_quantity().await,
                "4" => self.list_low_stock().await,
                "5" => self.delete_stock_item().await,
                "0" => return Ok(()),
                _ => Err(InputError::UnknownChoice { input: choice.clone() }.into()),
            };
            self.recover(result)?;
        }
    }

    fn print_stock_rows(&mut self, items: &[StockItem]) -> CliResult<()> {
        for item in items {
            let flag = if item.needs_restock() { "LOW" } else { "OK" };
            writeln!(
                self.out,
                "{:>4}  {:<30} {:>8} {:<8} (min {})  [{flag}]",
                item.id.unwrap_or_default(),
                item.name,
                fmt_amount(item.quantity),
                item.unit,
                fmt_amount(item.minimum)
            )?;
        }
        Ok(())
    }

    async fn list_stock(&mut self) -> CliResult<()> {
        let items = self.db.stock().list().await?;
        if items.is_empty() {
            writeln!(self.out, "No stock items registered.")?;
            return Ok(());
        }
        self.print_stock_rows(&items)
    }

    async fn list_low_stock(&mut self) -> CliResult<()> {
        let items = self.db.stock().list_low_stock().await?;
        if items.is_empty() {
            writeln!(self.out, "All items are above their minimum.")?;
            return Ok(());
        }
        self.print_stock_rows(&items)
    }

    async fn add_stock_item(&mut self) -> CliResult<()> {
        let name = self.prompt_required("Name", "name")?;
        let unit = self.prompt_required("Unit (kg, dozen, ...)", "unit")?;
        let quantity: f64 = self.prompt_number("Quantity")?;
        let minimum: f64 = self.prompt_number("Minimum")?;

        let item = StockItem::new(name, unit, quantity, minimum);
        let id = self.db.stock().create(&item).await?;
        writeln!(self.out, "Stock item '{}' added with ID {id}.", item.name)?;
        Ok(())
    }

    async fn set_stock_quantity(&mut self) -> CliResult<()> {
        let id = self.prompt_id("Item ID")?;
        let Some(item) = self.db.stock().get(id).await? else {
            return Err(InputError::not_found("Stock item", id).into());
        };

        let quantity: f64 =
            self.prompt_number(&format!("New quantity in {} [{}]", item.unit, fmt_amount(item.quantity)))?;
        found(self.db.stock().set_quantity(id, quantity).await?, "Stock item", id)?;
        writeln!(
            self.out,
            "{} now at {} {}.",
            item.name,
            fmt_amount(quantity),
            item.unit
        )?;
        Ok(())
    }

    async fn delete_stock_item(&mut self) -> CliResult<()> {
        let id = self.prompt_id("Item ID")?;
        let Some(item) = self.db.stock().get(id).await? else {
            return Err(InputError::not_found("Stock item", id).into());
        };

        if !self.confirm(&format!("Delete '{}'?", item.name))? {
            writeln!(self.out, "Cancelled.")?;
            return Ok(());
        }

        found(self.db.stock().delete(id).await?, "Stock item", id)?;
        writeln!(self.out, "Stock item {id} deleted.")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::shell::tests::{drive, memory_db};
    use bakery_core::StockItem;

    #[tokio::test]
    async fn test_add_and_flag_low() {
        let db = memory_db().await;
        let out = drive(&db, "4\n2\nOvos\ndozen\n3\n5\n2\nFarinha\nkg\n50\n10\n1\n0\n0\n").await;

        assert!(out.contains("Stock item 'Ovos' added with ID 1."));
        let farinha = out.lines().find(|l| l.contains("Farinha") && l.contains('[')).unwrap();
        let ovos = out.lines().find(|l| l.contains("Ovos") && l.contains('[')).unwrap();
        assert!(farinha.ends_with("[OK]"));
        assert!(ovos.ends_with("[LOW]"));
    }

    #[tokio::test]
    async fn test_set_quantity_and_low_list() {
        let db = memory_db().await;
        let id = db.stock().create(&StockItem::new("Manteiga", "kg", 8.0, 3.0)).await.unwrap();

        let out = drive(&db, &format!("4\n4\n3\n{id}\n2.5\n4\n0\n0\n")).await;

        assert!(out.contains("All items are above their minimum."));
        assert!(out.contains("Manteiga now at 2.5 kg."));
        assert!(out.contains("(min 3)  [LOW]"));
        assert_eq!(db.stock().get(id).await.unwrap().unwrap().quantity, 2.5);
    }

    #[tokio::test]
    async fn test_bad_quantity_and_missing_item() {
        let db = memory_db().await;
        let id = db.stock().create(&StockItem::new("Açúcar", "kg", 30.0, 8.0)).await.unwrap();

        let out = drive(&db, &format!("4\n3\n{id}\nlots\n3\n99\n0\n0\n")).await;

        assert!(out.contains("Error: 'lots' is not a valid number"));
        assert!(out.contains("Error: Stock item 99 not found"));
        assert_eq!(db.stock().get(id).await.unwrap().unwrap().quantity, 30.0);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = memory_db().await;
        let id = db.stock().create(&StockItem::new("Ovos", "dozen", 20.0, 5.0)).await.unwrap();

        let out = drive(&db, &format!("4\n5\n{id}\ny\n0\n0\n")).await;

        assert!(out.contains(&format!("Stock item {id} deleted.")));
        assert_eq!(db.stock().count().await.unwrap(), 0);
    }
}

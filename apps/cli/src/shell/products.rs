//! Products menu.

use std::io::{BufRead, Write};

use bakery_core::{Money, Product};

use super::{found, parse_number, Shell};
use crate::error::{CliResult, InputError};

impl<R: BufRead, W: Write> Shell<R, W> {
    pub(super) async fn products_menu(&mut self) -> CliResult<()> {
        loop {
            self.menu(
                "Products",
                &["List products", "Add product", "Update product", "Delete product"],
                "Back",
            )?;

            let choice = self.prompt("Choose an option")?;
            let result = match choice.as_str() {
                "1" => self.list_products().await,
                "2" => self.add_product().await,
                "3" => self.update_product().await,
                "4" => self.delete_product().await,
                "0" => return Ok(()),
                _ => Err(InputError::UnknownChoice { input: choice.clone() }.into()),
            };
            self.recover(result)?;
        }
    }

    async fn list_products(&mut self) -> CliResult<()> {
        let products = self.db.products().list().await?;
        if products.is_empty() {
            writeln!(self.out, "No products registered.")?;
            return Ok(());
        }

        writeln!(self.out, "{:>4}  {:<30} {:>10}  {:>6}", "ID", "Name", "Price", "Prep")?;
        for product in &products {
            writeln!(
                self.out,
                "{:>4}  {:<30} {:>10}  {:>4}min",
                product.id.unwrap_or_default(),
                product.name,
                product.price.to_string(),
                product.prep_minutes
            )?;
            if !product.description.is_empty() {
                writeln!(self.out, "      {}", product.description)?;
            }
        }
        Ok(())
    }

    async fn add_product(&mut self) -> CliResult<()> {
        let name = self.prompt_required("Name", "name")?;
        let description = self.prompt("Description")?;
        let price = self.prompt_money("Price")?;
        let prep_minutes = self.prompt_number("Preparation time (minutes)")?;

        let product = Product::new(name, description, price, prep_minutes);
        let id = self.db.products().create(&product).await?;
        writeln!(self.out, "Product '{}' added with ID {id}.", product.name)?;
        Ok(())
    }

    async fn update_product(&mut self) -> CliResult<()> {
        let id = self.prompt_id("Product ID")?;
        let Some(mut product) = self.db.products().get(id).await? else {
            return Err(InputError::not_found("Product", id).into());
        };

        writeln!(self.out, "Press Enter to keep the current value.")?;
        if let Some(name) = self.prompt_keep("Name", &product.name)? {
            product.name = name;
        }
        if let Some(description) = self.prompt_keep("Description", &product.description)? {
            product.description = description;
        }
        if let Some(price) = self.prompt_keep("Price", &product.price.to_plain_string())? {
            product.price = price.parse::<Money>()?;
        }
        let current = product.prep_minutes.to_string();
        if let Some(minutes) = self.prompt_keep("Preparation time (minutes)", &current)? {
            product.prep_minutes = parse_number(&minutes)?;
        }

        found(self.db.products().update(&product).await?, "Product", id)?;
        writeln!(self.out, "Product {id} updated.")?;
        Ok(())
    }

    async fn delete_product(&mut self) -> CliResult<()> {
        let id = self.prompt_id("Product ID")?;
        let Some(product) = self.db.products().get(id).await? else {
            return Err(InputError::not_found("Product", id).into());
        };

        if !self.confirm(&format!("Delete '{}'?", product.name))? {
            writeln!(self.out, "Cancelled.")?;
            return Ok(());
        }

        found(self.db.products().delete(id).await?, "Product", id)?;
        writeln!(self.out, "Product {id} deleted.")?;
        Ok(())
    }
}

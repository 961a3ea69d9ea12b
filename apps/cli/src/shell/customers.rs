//! Customers menu.

use std::io::{BufRead, Write};

use bakery_core::Customer;

use super::{found, Shell};
use crate::error::{CliResult, InputError};

impl<R: BufRead, W: Write> Shell<R, W> {
    pub(super) async fn customers_menu(&mut self) -> CliResult<()> {
        loop {
            self.menu(
                "Customers",
                &["List customers", "Add customer", "Update customer", "Delete customer"],
                "Back",
            )?;

            let choice = self.prompt("Choose an option")?;
            let result = match choice.as_str() {
                "1" => self.list_customers().await,
                "2" => self.add_customer().await,
                "3" => self.update_customer().await,
                "4" => self.delete_customer().await,
                "0" => return Ok(()),
                _ => Err(InputError::UnknownChoice { input: choice.clone() }.into()),
            };
            self.recover(result)?;
        }
    }

    pub(super) async fn list_customers(&mut self) -> CliResult<()> {
        let customers = self.db.customers().list().await?;
        if customers.is_empty() {
            writeln!(self.out, "No customers registered.")?;
            return Ok(());
        }

        for customer in &customers {
            writeln!(
                self.out,
                "{:>4}  {:<30} {}",
                customer.id.unwrap_or_default(),
                customer.name,
                customer.phone
            )?;
            if let Some(email) = &customer.email {
                writeln!(self.out, "      email: {email}")?;
            }
            if let Some(address) = &customer.address {
                writeln!(self.out, "      address: {address}")?;
            }
        }
        Ok(())
    }

    async fn add_customer(&mut self) -> CliResult<()> {
        let name = self.prompt_required("Name", "name")?;
        let phone = self.prompt_required("Phone", "phone")?;

        let mut customer = Customer::new(name, phone);
        customer.email = self.prompt_optional("Email (optional)")?;
        customer.address = self.prompt_optional("Address (optional)")?;

        let id = self.db.customers().create(&customer).await?;
        writeln!(self.out, "Customer '{}' added with ID {id}.", customer.name)?;
        Ok(())
    }

    async fn update_customer(&mut self) -> CliResult<()> {
        let id = self.prompt_id("Customer ID")?;
        let Some(mut customer) = self.db.customers().get(id).await? else {
            return Err(InputError::not_found("Customer", id).into());
        };

        writeln!(self.out, "Press Enter to keep the current value.")?;
        if let Some(name) = self.prompt_keep("Name", &customer.name)? {
            customer.name = name;
        }
        if let Some(phone) = self.prompt_keep("Phone", &customer.phone)? {
            customer.phone = phone;
        }
        let current = customer.email.clone().unwrap_or_default();
        if let Some(email) = self.prompt_keep("Email", &current)? {
            customer.email = Some(email);
        }
        let current = customer.address.clone().unwrap_or_default();
        if let Some(address) = self.prompt_keep("Address", &current)? {
            customer.address = Some(address);
        }

        found(self.db.customers().update(&customer).await?, "Customer", id)?;
        writeln!(self.out, "Customer {id} updated.")?;
        Ok(())
    }

    async fn delete_customer(&mut self) -> CliResult<()> {
        let id = self.prompt_id("Customer ID")?;
        let Some(customer) = self.db.customers().get(id).await? else {
            return Err(InputError::not_found("Customer", id).into());
        };

        if !self.confirm(&format!("Delete '{}'?", customer.name))? {
            writeln!(self.out, "Cancelled.")?;
            return Ok(());
        }

        found(self.db.customers().delete(id).await?, "Customer", id)?;
        writeln!(self.out, "Customer {id} deleted.")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::shell::tests::{drive, memory_db};
    use bakery_core::{Customer, Order};
    use chrono::Utc;

    #[tokio::test]
    async fn test_add_with_optional_fields_skipped() {
        let db = memory_db().await;
        let out = drive(&db, "2\n2\nAna Costa\n11977777777\n\n\n1\n0\n0\n").await;

        assert!(out.contains("Customer 'Ana Costa' added with ID 1."));
        let ana = db.customers().get(1).await.unwrap().unwrap();
        assert_eq!(ana.email, None);
        assert_eq!(ana.address, None);
    }

    #[tokio::test]
    async fn test_missing_phone_is_required() {
        let db = memory_db().await;
        let out = drive(&db, "2\n2\nAna Costa\n\n0\n0\n").await;

        assert!(out.contains("Error: phone is required"));
        assert_eq!(db.customers().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_invalid_email_is_rejected_by_the_store() {
        let db = memory_db().await;
        let out = drive(&db, "2\n2\nAna\n119\nnope\n\n0\n0\n").await;

        assert!(out.contains("Error: Invalid data: email has invalid format"));
    }

    #[tokio::test]
    async fn test_update_sets_email() {
        let db = memory_db().await;
        let id = db.customers().create(&Customer::new("Maria", "11999999999")).await.unwrap();

        drive(&db, &format!("2\n3\n{id}\n\n\nmaria@email.com\n\n0\n0\n")).await;

        let maria = db.customers().get(id).await.unwrap().unwrap();
        assert_eq!(maria.phone, "11999999999");
        assert_eq!(maria.email.as_deref(), Some("maria@email.com"));
        assert_eq!(maria.address, None);
    }

    #[tokio::test]
    async fn test_delete_with_orders_is_refused() {
        let db = memory_db().await;
        let id = db.customers().create(&Customer::new("Maria", "11999999999")).await.unwrap();
        db.orders().create(&Order::new(id, Utc::now(), Utc::now())).await.unwrap();

        let out = drive(&db, &format!("2\n4\n{id}\ny\n0\n0\n")).await;

        assert!(out.contains("is still referenced by 1 order(s)"));
        assert!(db.customers().get(id).await.unwrap().is_some());
    }
}

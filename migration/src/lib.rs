//! Database migrations for the Customer Registry.
//!
//! This module contains all database migrations using SeaORM Migration.

pub use sea_orm_migration::prelude::*;

mod m2025_09_01_000001_create_customers;
mod m2025_09_01_000002_add_customers_email_index;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2025_09_01_000001_create_customers::Migration),
            Box::new(m2025_09_01_000002_add_customers_email_index::Migration),
        ]
    }
}

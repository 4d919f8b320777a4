pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_users_table;
mod m20250102_000001_create_plans_table;
mod m20250103_000001_create_transactions_table;
mod m20250104_000001_create_token_prices_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users_table::Migration),
            Box::new(m20250102_000001_create_plans_table::Migration),
            Box::new(m20250103_000001_create_transactions_table::Migration),
            Box::new(m20250104_000001_create_token_prices_table::Migration)
        ]
    }
}

pub use sea_orm_migration::prelude::*;

mod m20250901_000001_create_master_tables;
mod m20250901_000002_create_vouchers_table;
mod m20250901_000003_create_users_table;
mod m20250901_000004_create_page_lock_tables;
mod m20250901_000005_create_theme_settings_table;
mod m20250901_000006_create_cash_adjustments_table;
mod m20250901_000007_create_mon_multipliers_table;
mod m20250901_000008_add_voucher_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_master_tables::Migration),
            Box::new(m20250901_000002_create_vouchers_table::Migration),
            Box::new(m20250901_000003_create_users_table::Migration),
            Box::new(m20250901_000004_create_page_lock_tables::Migration),
            Box::new(m20250901_000005_create_theme_settings_table::Migration),
            Box::new(m20250901_000006_create_cash_adjustments_table::Migration),
            Box::new(m20250901_000007_create_mon_multipliers_table::Migration),
            Box::new(m20250901_000008_add_voucher_indexes::Migration),
        ]
    }
}

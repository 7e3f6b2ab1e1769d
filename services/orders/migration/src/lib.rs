pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_passcode_challenges;
mod m20260301_000002_create_orders;
mod m20260301_000003_create_site_settings;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_passcode_challenges::Migration),
            Box::new(m20260301_000002_create_orders::Migration),
            Box::new(m20260301_000003_create_site_settings::Migration),
        ]
    }
}

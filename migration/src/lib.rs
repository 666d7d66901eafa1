pub use sea_orm_migration::prelude::*;

mod m20250901_000001_initial;
mod m20250915_000001_add_points_ledger;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_initial::Migration),
            Box::new(m20250915_000001_add_points_ledger::Migration),
        ]
    }
}

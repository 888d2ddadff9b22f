pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_ideas_table;
mod m20250301_000002_add_votes_and_comments;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_ideas_table::Migration),
            Box::new(m20250301_000002_add_votes_and_comments::Migration),
        ]
    }
}

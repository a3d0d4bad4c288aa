pub use sea_orm_migration::prelude::*;

mod m20240801_120000_create_schema;
mod m20240801_120500_create_rooms_and_messages;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240801_120000_create_schema::Migration),
            Box::new(m20240801_120500_create_rooms_and_messages::Migration),
        ]
    }
}

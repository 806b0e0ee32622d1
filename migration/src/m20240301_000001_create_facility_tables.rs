use entity::{facility, food_facility, supplier};
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{EntityTrait, Schema};

#[derive(DeriveMigrationName)]
pub struct Migration;

fn create_stmt<E: EntityTrait>(schema: &Schema, e: E) -> TableCreateStatement {
    schema
        .create_table_from_entity(e)
        .if_not_exists()
        .to_owned()
}

fn drop_stmt<E: EntityTrait>(e: E) -> TableDropStatement {
    Table::drop().table(e).if_exists().to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(manager.get_database_backend());

        // Referenced tables first; food_facility points at facility, facility at supplier.
        let stmts = vec![
            create_stmt(&schema, supplier::Entity),
            create_stmt(&schema, facility::Entity),
            create_stmt(&schema, food_facility::Entity),
        ];

        for stmt in stmts {
            manager.create_table(stmt).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let stmts = vec![
            drop_stmt(food_facility::Entity),
            drop_stmt(facility::Entity),
            drop_stmt(supplier::Entity),
        ];

        for stmt in stmts {
            manager.drop_table(stmt).await?;
        }

        Ok(())
    }
}

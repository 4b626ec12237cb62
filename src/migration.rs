//! Idempotent schema bootstrap.
//!
//! Run [`Migrator::up`] once at startup before constructing the store:
//!
//! ```no_run
//! use sea_orm_migration::MigratorTrait;
//! use seaorm_session_store::migration::Migrator;
//!
//! # async fn example(conn: sea_orm::DatabaseConnection) -> Result<(), sea_orm::DbErr> {
//! Migrator::up(&conn, None).await?;
//! # Ok(())
//! # }
//! ```

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_sessions_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    // Override the name of the migration table to avoid conflicts
    fn migration_table_name() -> sea_orm::DynIden {
        Alias::new("seaorm_session_store_migrations").into_iden()
    }

    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(
            m20240101_000001_create_sessions_table::Migration,
        )]
    }
}

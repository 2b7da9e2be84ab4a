/// Connection setup against an in-memory SQLite pool
pub mod db_tests;


use migration::MigratorTrait;
use sea_orm::DatabaseConnection;

/// Fresh migrated in-memory database for a single test.
pub async fn migrated_db() -> anyhow::Result<DatabaseConnection> {
    let db = crate::db::connect_with_config(&configs::DatabaseConfig::sqlite_memory()).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

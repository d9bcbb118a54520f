// Public modules
pub mod auth;
pub mod database;
pub mod db_migration;
pub mod domains;
pub mod errors;
pub mod notifications;
pub mod types;
pub mod validation;

use sqlx::SqlitePool;

/// Open the database and bring the schema up to date. Call once at startup;
/// services are then constructed over the returned pool.
pub async fn initialize(db_url: &str) -> Result<SqlitePool, errors::DbError> {
    let pool = database::connect(db_url).await?;
    db_migration::initialize_database(&pool).await?;
    Ok(pool)
}

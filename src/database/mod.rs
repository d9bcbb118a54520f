use crate::errors::DbError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Build the SQLite connection pool. `db_url` is a sqlx SQLite URL, e.g.
/// `sqlite:casa.db` or `sqlite::memory:`.
pub async fn connect(db_url: &str) -> Result<SqlitePool, DbError> {
    let options = SqliteConnectOptions::from_str(db_url)
        .map_err(|e| DbError::ConnectionPool(format!("Invalid database URL: {}", e)))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(|e| DbError::ConnectionPool(format!("Database connection failed: {}", e)))?;

    Ok(pool)
}

use crate::errors::DbError;
use chrono::Utc;
use sqlx::SqlitePool;

// Embed all migration SQL files at compile time
const MIGRATION_CORE_SCHEMA: &str = include_str!("../migrations/20250801000000_core_schema.sql");
const MIGRATION_INVITATIONS: &str = include_str!("../migrations/20250812000000_invitations.sql");

// List of migrations with their names and SQL content, in apply order
const MIGRATIONS: &[(&str, &str)] = &[
    ("20250801000000_core_schema.sql", MIGRATION_CORE_SCHEMA),
    ("20250812000000_invitations.sql", MIGRATION_INVITATIONS),
];

/// Bring the database schema up to date, applying any pending migrations
pub async fn initialize_database(pool: &SqlitePool) -> Result<(), DbError> {
    create_migrations_table(pool).await?;

    let applied = applied_migrations(pool).await?;

    for (name, sql) in MIGRATIONS {
        if applied.iter().any(|a| a == name) {
            continue;
        }

        log::info!("Applying migration {}", name);
        apply_migration(pool, name, sql).await?;
    }

    Ok(())
}

async fn create_migrations_table(pool: &SqlitePool) -> Result<(), DbError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS migrations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| DbError::Migration(format!("Failed to create migrations table: {}", e)))?;

    Ok(())
}

async fn applied_migrations(pool: &SqlitePool) -> Result<Vec<String>, DbError> {
    sqlx::query_scalar::<_, String>("SELECT name FROM migrations ORDER BY id")
        .fetch_all(pool)
        .await
        .map_err(|e| DbError::Migration(format!("Failed to read applied migrations: {}", e)))
}

async fn apply_migration(pool: &SqlitePool, name: &str, sql: &str) -> Result<(), DbError> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| DbError::Migration(format!("Failed to begin migration {}: {}", name, e)))?;

    // SQLite executes one statement at a time; split on terminators
    for statement in sql.split(';') {
        let statement = statement.trim();
        if statement.is_empty() {
            continue;
        }
        sqlx::query(statement)
            .execute(&mut *tx)
            .await
            .map_err(|e| DbError::Migration(format!("Migration {} failed: {}", name, e)))?;
    }

    sqlx::query("INSERT INTO migrations (name, applied_at) VALUES (?, ?)")
        .bind(name)
        .bind(Utc::now().to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| DbError::Migration(format!("Failed to record migration {}: {}", name, e)))?;

    tx.commit()
        .await
        .map_err(|e| DbError::Migration(format!("Failed to commit migration {}: {}", name, e)))?;

    Ok(())
}

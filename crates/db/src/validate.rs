//! Startup schema checks.

use sqlx::SqlitePool;
use tracing::{info, warn};

const REQUIRED_TABLES: &[&str] = &["mobile_products", "laptop_products", "expert_reviews"];

/// Tables the catalog needs but the database lacks.
pub async fn missing_tables(pool: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
    let mut missing = Vec::new();
    for table in REQUIRED_TABLES {
        let exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(table)
        .fetch_one(pool)
        .await?
            > 0;
        if !exists {
            missing.push(table.to_string());
        }
    }
    Ok(missing)
}

/// Log the schema state at startup. Missing tables are a warning, not a
/// hard failure: migrations may be applied by an operator out of band.
pub async fn check_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let missing = missing_tables(pool).await?;
    if missing.is_empty() {
        info!("catalog schema validated");
    } else {
        warn!(missing = ?missing, "catalog schema is incomplete, run migrations");
    }
    Ok(())
}

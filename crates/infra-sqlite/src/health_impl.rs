// SQLite health check implementation
use crate::migration::current_schema_version;
use async_trait::async_trait;
use opskill_core::error::{AppError, Result};
use opskill_core::port::{DatabaseHealth, HealthCheck};
use sqlx::SqlitePool;
use std::time::Instant;
use tracing::debug;

const COUNTED_TABLES: &[&str] = &["users", "jobs", "applications", "contracts", "reviews", "tickets"];

pub struct SqliteHealthCheck {
    pool: SqlitePool,
}

impl SqliteHealthCheck {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Database size from page count and page size
    async fn db_size_bytes(&self) -> Result<i64> {
        let page_count: i64 = sqlx::query_scalar("PRAGMA page_count")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to get page count: {}", e)))?;

        let page_size: i64 = sqlx::query_scalar("PRAGMA page_size")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to get page size: {}", e)))?;

        Ok(page_count * page_size)
    }
}

#[async_trait]
impl HealthCheck for SqliteHealthCheck {
    async fn check(&self) -> Result<DatabaseHealth> {
        let started = Instant::now();
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Database unreachable: {}", e)))?;
        let latency_ms = started.elapsed().as_millis() as u64;

        let schema_version = current_schema_version(&self.pool).await?;

        // Tables only exist once migrations ran
        let mut table_counts = Vec::with_capacity(COUNTED_TABLES.len());
        if schema_version > 0 {
            for table in COUNTED_TABLES {
                let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| AppError::Database(format!("Failed to count {}: {}", table, e)))?;
                table_counts.push((table.to_string(), count));
            }
        }

        let health = DatabaseHealth {
            connected: true,
            latency_ms,
            db_size_bytes: self.db_size_bytes().await?,
            schema_version,
            table_counts,
        };
        debug!(latency_ms, schema_version, "Database health checked");
        Ok(health)
    }
}

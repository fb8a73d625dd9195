// Health check port
use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;

/// Database health as seen by a health check
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseHealth {
    pub connected: bool,
    pub latency_ms: u64,
    pub db_size_bytes: i64,
    pub schema_version: i64,
    /// Row count per marketplace table, in table order
    pub table_counts: Vec<(String, i64)>,
}

/// Storage health operations
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Round-trip the database and gather basic statistics
    async fn check(&self) -> Result<DatabaseHealth>;
}

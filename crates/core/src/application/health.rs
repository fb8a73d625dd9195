// Health reporting for the `health` command

use crate::port::{DatabaseHealth, HealthCheck, TimeProvider};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    /// RFC3339, UTC
    pub timestamp: String,
    pub uptime: String,
    pub database: Option<DatabaseHealth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub environment: String,
}

pub struct HealthService {
    checker: Arc<dyn HealthCheck>,
    time_provider: Arc<dyn TimeProvider>,
    environment: String,
    start_time: Instant,
}

impl HealthService {
    pub fn new(
        checker: Arc<dyn HealthCheck>,
        time_provider: Arc<dyn TimeProvider>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            checker,
            time_provider,
            environment: environment.into(),
            start_time: Instant::now(),
        }
    }

    /// Check the database; a failed check yields status `error`, never Err
    pub async fn report(&self) -> HealthReport {
        let (status, database, error) = match self.checker.check().await {
            Ok(db) => (HealthStatus::Ok, Some(db), None),
            Err(e) => {
                warn!(error = %e, "Database health check failed");
                (HealthStatus::Error, None, Some(e.to_string()))
            }
        };

        HealthReport {
            status,
            timestamp: self.time_provider.now().to_rfc3339(),
            uptime: format_uptime(self.start_time.elapsed().as_secs()),
            database,
            error,
            environment: self.environment.clone(),
        }
    }
}

/// `"{d}d {h}h {m}m {s}s"`
pub fn format_uptime(total_secs: u64) -> String {
    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let seconds = total_secs % 60;
    format!("{}d {}h {}m {}s", days, hours, minutes, seconds)
}

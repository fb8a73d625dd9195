// SQLite ApplicationRepository Implementation

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use opskill_core::domain::{Application, ApplicationId, ApplicationStatus, JobId, NewApplication, UserId};
use opskill_core::error::{AppError, Result};
use opskill_core::port::{ApplicationRepository, TimeProvider};
use sqlx::SqlitePool;
use std::sync::Arc;

pub struct SqliteApplicationRepository {
    pool: SqlitePool,
    time_provider: Arc<dyn TimeProvider>,
}

impl SqliteApplicationRepository {
    pub fn new(pool: SqlitePool, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            pool,
            time_provider,
        }
    }
}

#[async_trait]
impl ApplicationRepository for SqliteApplicationRepository {
    async fn insert(&self, application: &NewApplication) -> Result<Application> {
        let now = self.time_provider.now_millis();

        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            INSERT INTO applications (
                job_id, talent_id, status, cover_letter, proposed_rate, estimated_days,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(application.job_id)
        .bind(application.talent_id)
        .bind(application.status.as_str())
        .bind(&application.cover_letter)
        .bind(application.proposed_rate)
        .bind(application.estimated_days)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.into_application()
    }

    async fn find_by_id(&self, id: ApplicationId) -> Result<Option<Application>> {
        let row = sqlx::query_as::<_, ApplicationRow>("SELECT * FROM applications WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(ApplicationRow::into_application).transpose()
    }

    async fn find_by_job(&self, job_id: JobId) -> Result<Vec<Application>> {
        let rows = sqlx::query_as::<_, ApplicationRow>(
            "SELECT * FROM applications WHERE job_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(ApplicationRow::into_application).collect()
    }

    async fn find_by_talent(&self, talent_id: UserId) -> Result<Vec<Application>> {
        let rows = sqlx::query_as::<_, ApplicationRow>(
            "SELECT * FROM applications WHERE talent_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(talent_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(ApplicationRow::into_application).collect()
    }

    async fn update_status(&self, id: ApplicationId, status: ApplicationStatus) -> Result<()> {
        let result = sqlx::query("UPDATE applications SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(self.time_provider.now_millis())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Application", id));
        }
        Ok(())
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ApplicationRow {
    id: i64,
    job_id: i64,
    talent_id: i64,
    status: String,
    cover_letter: Option<String>,
    proposed_rate: Option<f64>,
    estimated_days: Option<i64>,
    created_at: i64,
    updated_at: i64,
}

impl ApplicationRow {
    pub(crate) fn into_application(self) -> Result<Application> {
        Ok(Application {
            id: self.id,
            job_id: self.job_id,
            talent_id: self.talent_id,
            status: self.status.parse()?,
            cover_letter: self.cover_letter,
            proposed_rate: self.proposed_rate,
            estimated_days: self.estimated_days,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

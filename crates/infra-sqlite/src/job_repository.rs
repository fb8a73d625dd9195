// SQLite JobRepository Implementation

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use opskill_core::domain::{
    CompanySummary, Job, JobId, JobSearch, JobStatus, JobWithCompany, NewJob, Page, UserId,
};
use opskill_core::error::{AppError, Result};
use opskill_core::port::{JobRepository, TimeProvider};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::sync::Arc;

pub struct SqliteJobRepository {
    pool: SqlitePool,
    time_provider: Arc<dyn TimeProvider>,
}

impl SqliteJobRepository {
    pub fn new(pool: SqlitePool, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            pool,
            time_provider,
        }
    }
}

#[async_trait]
impl JobRepository for SqliteJobRepository {
    async fn insert(&self, job: &NewJob) -> Result<Job> {
        let now = self.time_provider.now_millis();

        let row = sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs (
                company_id, title, description, category, location,
                pay_type, pay_amount, start_date, end_date, status,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(job.company_id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(job.category.as_str())
        .bind(&job.location)
        .bind(job.pay_type.as_str())
        .bind(job.pay_amount)
        .bind(job.start_date)
        .bind(job.end_date)
        .bind(job.status.as_str())
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.into_job()
    }

    async fn find_by_id(&self, id: JobId) -> Result<Option<Job>> {
        let row = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(JobRow::into_job).transpose()
    }

    async fn find_by_company(&self, company_id: UserId) -> Result<Vec<Job>> {
        let rows = sqlx::query_as::<_, JobRow>(
            "SELECT * FROM jobs WHERE company_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(JobRow::into_job).collect()
    }

    async fn find_with_company(&self, id: JobId) -> Result<Option<JobWithCompany>> {
        let Some(job) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let company = sqlx::query_as::<_, (i64, String, Option<String>)>(
            "SELECT id, name, profile_photo FROM users WHERE id = ?",
        )
        .bind(job.company_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .map(|(id, name, profile_photo)| CompanySummary {
            id,
            name,
            profile_photo,
        });

        Ok(Some(JobWithCompany { job, company }))
    }

    async fn search(&self, search: &JobSearch) -> Result<Vec<Job>> {
        let page = Page::new(search.page.limit, search.page.offset);

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM jobs WHERE status = ");
        query.push_bind(JobStatus::Open.as_str());

        if let Some(category) = search.category {
            query.push(" AND category = ");
            query.push_bind(category.as_str());
        }
        if let Some(pattern) = search.location_pattern() {
            query.push(" AND LOWER(location) LIKE ");
            query.push_bind(pattern);
            query.push(" ESCAPE '\\'");
        }
        if let Some(min_pay) = search.min_pay {
            query.push(" AND pay_amount >= ");
            query.push_bind(min_pay);
        }
        if let Some(pay_type) = search.pay_type {
            query.push(" AND pay_type = ");
            query.push_bind(pay_type.as_str());
        }

        query.push(" ORDER BY created_at ASC, id ASC LIMIT ");
        query.push_bind(page.limit);
        query.push(" OFFSET ");
        query.push_bind(page.offset);

        let rows = query
            .build_query_as::<JobRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.into_iter().map(JobRow::into_job).collect()
    }

    async fn update_status(&self, id: JobId, status: JobStatus) -> Result<()> {
        let result = sqlx::query("UPDATE jobs SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(self.time_provider.now_millis())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Job", id));
        }
        Ok(())
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct JobRow {
    id: i64,
    company_id: i64,
    title: String,
    description: String,
    category: String,
    location: String,
    pay_type: String,
    pay_amount: f64,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
    status: String,
    created_at: i64,
    updated_at: i64,
}

impl JobRow {
    pub(crate) fn into_job(self) -> Result<Job> {
        Ok(Job {
            id: self.id,
            company_id: self.company_id,
            title: self.title,
            description: self.description,
            category: self.category.parse()?,
            location: self.location,
            pay_type: self.pay_type.parse()?,
            pay_amount: self.pay_amount,
            start_date: self.start_date,
            end_date: self.end_date,
            status: self.status.parse()?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{insert_company, new_job, setup_test_db};
    use opskill_core::domain::{JobCategory, PayType};
    use opskill_core::port::FixedTimeProvider;

    #[tokio::test]
    async fn test_insert_and_find() {
        let pool = setup_test_db().await;
        let company_id = insert_company(&pool, "acme@example.com").await;
        let repo = SqliteJobRepository::new(pool, Arc::new(FixedTimeProvider(5_000)));

        let job = repo.insert(&new_job(company_id, "Event staff")).await.unwrap();
        assert_eq!(job.status, JobStatus::Open);
        assert_eq!(job.created_at, 5_000);

        let found = repo.find_by_id(job.id).await.unwrap().unwrap();
        assert_eq!(found, job);

        let with_company = repo.find_with_company(job.id).await.unwrap().unwrap();
        assert_eq!(with_company.company.map(|c| c.id), Some(company_id));
        assert!(repo.find_with_company(job.id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_company_is_rejected() {
        let pool = setup_test_db().await;
        let repo = SqliteJobRepository::new(pool, Arc::new(FixedTimeProvider(5_000)));

        let err = repo.insert(&new_job(404, "Orphan")).await.unwrap_err();
        assert!(err.to_string().contains("Referenced record does not exist"));
    }

    #[tokio::test]
    async fn test_search_combines_filters() {
        let pool = setup_test_db().await;
        let company_id = insert_company(&pool, "acme@example.com").await;
        let repo = SqliteJobRepository::new(pool, Arc::new(FixedTimeProvider(5_000)));

        let first = repo.insert(&new_job(company_id, "Waiter")).await.unwrap();

        let mut photo = new_job(company_id, "Wedding photographer");
        photo.category = JobCategory::Photography;
        photo.location = "Bengaluru".to_string();
        photo.pay_type = PayType::Daily;
        photo.pay_amount = 8_000.0;
        let photo = repo.insert(&photo).await.unwrap();

        let closed = repo.insert(&new_job(company_id, "Old gig")).await.unwrap();
        repo.update_status(closed.id, JobStatus::Cancelled)
            .await
            .unwrap();

        let open = repo.search(&JobSearch::default()).await.unwrap();
        assert_eq!(open.iter().map(|j| j.id).collect::<Vec<_>>(), vec![first.id, photo.id]);

        let filtered = repo
            .search(&JobSearch {
                category: Some(JobCategory::Photography),
                location: Some("bengal".to_string()),
                min_pay: Some(5_000.0),
                pay_type: Some(PayType::Daily),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, photo.id);

        // Category matches but pay type does not: filters are ANDed
        let none = repo
            .search(&JobSearch {
                category: Some(JobCategory::Photography),
                pay_type: Some(PayType::Hourly),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(none.is_empty());

        let page = repo
            .search(&JobSearch {
                page: Page::new(1, 1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, photo.id);
    }

    #[tokio::test]
    async fn test_location_wildcards_are_literal() {
        let pool = setup_test_db().await;
        let company_id = insert_company(&pool, "acme@example.com").await;
        let repo = SqliteJobRepository::new(pool, Arc::new(FixedTimeProvider(5_000)));
        repo.insert(&new_job(company_id, "Waiter")).await.unwrap();

        let jobs = repo
            .search(&JobSearch {
                location: Some("%".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(jobs.is_empty());
    }

    #[tokio::test]
    async fn test_update_status_missing_job() {
        let pool = setup_test_db().await;
        let repo = SqliteJobRepository::new(pool, Arc::new(FixedTimeProvider(5_000)));
        let err = repo.update_status(77, JobStatus::Completed).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}

// SQLite Transaction Implementation

use crate::application_repository::ApplicationRow;
use crate::contract_repository::{self, ContractRow};
use crate::error::map_sqlx_error;
use crate::job_repository::JobRow;
use async_trait::async_trait;
use opskill_core::domain::{
    Application, ApplicationId, ApplicationStatus, Contract, ContractId, ContractStatus, Job,
    JobId, JobStatus, NewContract, UserId,
};
use opskill_core::error::{AppError, Result};
use opskill_core::port::{
    MarketplaceTransaction, TimeProvider, Transaction, TransactionalMarketplace,
};
use sqlx::{Sqlite, SqlitePool, Transaction as SqlxTransaction};
use std::sync::Arc;

/// Hands out pool-backed transactions for multi-table workflows
pub struct SqliteTransactionManager {
    pool: SqlitePool,
    time_provider: Arc<dyn TimeProvider>,
}

impl SqliteTransactionManager {
    pub fn new(pool: SqlitePool, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            pool,
            time_provider,
        }
    }
}

#[async_trait]
impl TransactionalMarketplace for SqliteTransactionManager {
    /// Takes the write lock up front: a deferred transaction that reads
    /// first would hit SQLITE_BUSY once another writer commits under it
    async fn begin_transaction(&self) -> Result<Box<dyn MarketplaceTransaction>> {
        let tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(map_sqlx_error)?;
        Ok(Box::new(SqliteMarketplaceTransaction::new(
            tx,
            Arc::clone(&self.time_provider),
        )))
    }
}

pub struct SqliteMarketplaceTransaction<'a> {
    tx: SqlxTransaction<'a, Sqlite>,
    time_provider: Arc<dyn TimeProvider>,
}

impl<'a> SqliteMarketplaceTransaction<'a> {
    pub fn new(tx: SqlxTransaction<'a, Sqlite>, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self { tx, time_provider }
    }

    async fn set_status(&mut self, table: &str, entity: &str, id: i64, status: &str) -> Result<()> {
        // `table` is always one of our own literals, never caller input
        let sql = format!("UPDATE {} SET status = ?, updated_at = ? WHERE id = ?", table);
        let result = sqlx::query(&sql)
            .bind(status)
            .bind(self.time_provider.now_millis())
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(entity, id));
        }
        Ok(())
    }
}

#[async_trait]
impl Transaction for SqliteMarketplaceTransaction<'_> {
    async fn commit(mut self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn rollback(mut self: Box<Self>) -> Result<()> {
        self.tx.rollback().await.map_err(map_sqlx_error)?;
        Ok(())
    }
}

#[async_trait]
impl MarketplaceTransaction for SqliteMarketplaceTransaction<'_> {
    async fn find_application(&mut self, id: ApplicationId) -> Result<Option<Application>> {
        let row = sqlx::query_as::<_, ApplicationRow>("SELECT * FROM applications WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        row.map(ApplicationRow::into_application).transpose()
    }

    async fn find_job(&mut self, id: JobId) -> Result<Option<Job>> {
        let row = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        row.map(JobRow::into_job).transpose()
    }

    async fn find_contract(&mut self, id: ContractId) -> Result<Option<Contract>> {
        let row = sqlx::query_as::<_, ContractRow>("SELECT * FROM contracts WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        row.map(ContractRow::into_contract).transpose()
    }

    async fn set_application_status(
        &mut self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> Result<()> {
        self.set_status("applications", "Application", id, status.as_str())
            .await
    }

    async fn set_job_status(&mut self, id: JobId, status: JobStatus) -> Result<()> {
        self.set_status("jobs", "Job", id, status.as_str()).await
    }

    async fn insert_contract(&mut self, contract: &NewContract) -> Result<Contract> {
        let now = self.time_provider.now_millis();
        contract_repository::insert_contract(&mut *self.tx, contract, now).await
    }

    async fn set_contract_status(&mut self, id: ContractId, status: ContractStatus) -> Result<()> {
        self.set_status("contracts", "Contract", id, status.as_str())
            .await
    }

    async fn increment_jobs_completed(&mut self, talent_id: UserId) -> Result<()> {
        let result = sqlx::query(
            "UPDATE users SET jobs_completed = jobs_completed + 1, updated_at = ? WHERE id = ?",
        )
        .bind(self.time_provider.now_millis())
        .bind(talent_id)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User", talent_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{insert_company, insert_job, insert_talent, new_contract, setup_test_db};
    use opskill_core::port::FixedTimeProvider;

    #[tokio::test]
    async fn test_commit_persists_steps() {
        let pool = setup_test_db().await;
        let company_id = insert_company(&pool, "acme@example.com").await;
        let job_id = insert_job(&pool, company_id).await;
        let talent_id = insert_talent(&pool, "ravi@example.com").await;
        let manager = SqliteTransactionManager::new(pool.clone(), Arc::new(FixedTimeProvider(50)));

        let mut tx = manager.begin_transaction().await.unwrap();
        tx.set_job_status(job_id, JobStatus::InProgress).await.unwrap();
        let contract = tx
            .insert_contract(&new_contract(job_id, talent_id, company_id, 750.0))
            .await
            .unwrap();
        tx.increment_jobs_completed(talent_id).await.unwrap();
        tx.commit().await.unwrap();

        let status: String = sqlx::query_scalar("SELECT status FROM jobs WHERE id = ?")
            .bind(job_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(status, "IN_PROGRESS");

        let contracts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contracts WHERE id = ?")
            .bind(contract.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(contracts, 1);

        let completed: i64 = sqlx::query_scalar("SELECT jobs_completed FROM users WHERE id = ?")
            .bind(talent_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(completed, 1);
    }

    #[tokio::test]
    async fn test_rollback_discards_steps() {
        let pool = setup_test_db().await;
        let company_id = insert_company(&pool, "acme@example.com").await;
        let job_id = insert_job(&pool, company_id).await;
        let manager = SqliteTransactionManager::new(pool.clone(), Arc::new(FixedTimeProvider(50)));

        let mut tx = manager.begin_transaction().await.unwrap();
        tx.set_job_status(job_id, JobStatus::Cancelled).await.unwrap();
        tx.rollback().await.unwrap();

        let status: String = sqlx::query_scalar("SELECT status FROM jobs WHERE id = ?")
            .bind(job_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(status, "OPEN");
    }

    #[tokio::test]
    async fn test_missing_rows_are_not_found() {
        let pool = setup_test_db().await;
        let manager = SqliteTransactionManager::new(pool, Arc::new(FixedTimeProvider(50)));

        let mut tx = manager.begin_transaction().await.unwrap();
        assert!(tx.find_application(1).await.unwrap().is_none());
        let err = tx
            .set_contract_status(1, ContractStatus::Completed)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}

// Transaction port for atomic multi-table workflows (hiring, completion)

use crate::domain::{
    Application, ApplicationId, ApplicationStatus, Contract, ContractId, ContractStatus, Job,
    JobId, JobStatus, NewContract, UserId,
};
use crate::error::Result;
use async_trait::async_trait;

/// Transaction trait for atomic multi-step operations
#[async_trait]
pub trait Transaction: Send {
    /// Commit the transaction
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Rollback the transaction
    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Source of marketplace transactions
#[async_trait]
pub trait TransactionalMarketplace: Send + Sync {
    /// Begin a new transaction
    async fn begin_transaction(&self) -> Result<Box<dyn MarketplaceTransaction>>;
}

/// Marketplace operations within a transaction.
///
/// Dropping the transaction without `commit` rolls every step back.
#[async_trait]
pub trait MarketplaceTransaction: Transaction {
    async fn find_application(&mut self, id: ApplicationId) -> Result<Option<Application>>;

    async fn find_job(&mut self, id: JobId) -> Result<Option<Job>>;

    async fn find_contract(&mut self, id: ContractId) -> Result<Option<Contract>>;

    async fn set_application_status(
        &mut self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> Result<()>;

    async fn set_job_status(&mut self, id: JobId, status: JobStatus) -> Result<()>;

    async fn insert_contract(&mut self, contract: &NewContract) -> Result<Contract>;

    async fn set_contract_status(&mut self, id: ContractId, status: ContractStatus) -> Result<()>;

    /// Bump the talent's jobs_completed counter by one
    async fn increment_jobs_completed(&mut self, talent_id: UserId) -> Result<()>;
}

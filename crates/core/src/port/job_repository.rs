// Job Repository Port (Interface)

use crate::domain::{Job, JobId, JobSearch, JobStatus, JobWithCompany, NewJob, UserId};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for Job persistence
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn insert(&self, job: &NewJob) -> Result<Job>;

    async fn find_by_id(&self, id: JobId) -> Result<Option<Job>>;

    /// All jobs posted by a company, newest first
    async fn find_by_company(&self, company_id: UserId) -> Result<Vec<Job>>;

    /// Job joined with its company's public fields
    async fn find_with_company(&self, id: JobId) -> Result<Option<JobWithCompany>>;

    /// OPEN jobs matching every given filter
    async fn search(&self, search: &JobSearch) -> Result<Vec<Job>>;

    async fn update_status(&self, id: JobId, status: JobStatus) -> Result<()>;
}

// Application Repository Port (Interface)

use crate::domain::{Application, ApplicationId, ApplicationStatus, JobId, NewApplication, UserId};
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Insert; Conflict if the talent already applied to the job
    async fn insert(&self, application: &NewApplication) -> Result<Application>;

    async fn find_by_id(&self, id: ApplicationId) -> Result<Option<Application>>;

    async fn find_by_job(&self, job_id: JobId) -> Result<Vec<Application>>;

    async fn find_by_talent(&self, talent_id: UserId) -> Result<Vec<Application>>;

    async fn update_status(&self, id: ApplicationId, status: ApplicationStatus) -> Result<()>;
}

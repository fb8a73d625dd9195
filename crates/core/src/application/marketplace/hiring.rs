// Hiring use cases: job postings, applications and the hire step

use super::MarketplaceService;
use crate::domain::{
    Application, ApplicationDraft, ApplicationId, ApplicationStatus, Contract, ContractTerms, Job,
    JobDraft, JobStatus, UserRole,
};
use crate::error::{AppError, Result};
use tracing::info;

impl MarketplaceService {
    /// Post a job on behalf of an active company account
    pub async fn post_job(&self, draft: JobDraft) -> Result<Job> {
        let new_job = draft.validate()?;

        let company = self
            .repos
            .users
            .find_by_id(new_job.company_id)
            .await?
            .ok_or_else(|| AppError::not_found("Company", new_job.company_id))?;
        if company.role != UserRole::Company {
            return Err(AppError::Forbidden(format!(
                "User {} is not a company account",
                company.id
            )));
        }
        if company.is_banned {
            return Err(AppError::Forbidden(format!("Company {} is banned", company.id)));
        }

        let job = self.repos.jobs.insert(&new_job).await?;
        info!(
            job_id = job.id,
            company_id = job.company_id,
            category = %job.category,
            "Job posted"
        );
        Ok(job)
    }

    pub async fn apply(&self, draft: ApplicationDraft) -> Result<Application> {
        let new_application = draft.validate()?;

        let job = self
            .repos
            .jobs
            .find_by_id(new_application.job_id)
            .await?
            .ok_or_else(|| AppError::not_found("Job", new_application.job_id))?;
        if !job.is_open() {
            return Err(AppError::InvalidState(format!(
                "Job {} is {} and not accepting applications",
                job.id, job.status
            )));
        }

        let talent = self
            .repos
            .users
            .find_by_id(new_application.talent_id)
            .await?
            .ok_or_else(|| AppError::not_found("Talent", new_application.talent_id))?;
        if !talent.is_talent() {
            return Err(AppError::Forbidden(format!(
                "User {} is not a talent account",
                talent.id
            )));
        }
        if talent.is_banned {
            return Err(AppError::Forbidden(format!("Talent {} is banned", talent.id)));
        }

        // UNIQUE(job_id, talent_id) turns a second bid into Conflict
        let application = self.repos.applications.insert(&new_application).await?;
        info!(
            application_id = application.id,
            job_id = application.job_id,
            talent_id = application.talent_id,
            "Application submitted"
        );
        Ok(application)
    }

    /// Shortlist or reject; hiring goes through `hire`
    pub async fn review_application(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> Result<Application> {
        if status == ApplicationStatus::Hired {
            return Err(AppError::InvalidState(
                "Applications are hired through a contract".to_string(),
            ));
        }

        let application = self
            .repos
            .applications
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Application", id))?;
        if application.status == ApplicationStatus::Hired {
            return Err(AppError::InvalidState(format!(
                "Application {} is already HIRED",
                id
            )));
        }

        self.repos.applications.update_status(id, status).await?;
        info!(application_id = id, status = %status, "Application status changed");
        Ok(Application {
            status,
            ..application
        })
    }

    /// Hire the applicant: application HIRED, job IN_PROGRESS, contract ACTIVE
    ///
    /// All three writes share one transaction; any failure leaves the
    /// application and job untouched.
    pub async fn hire(&self, application_id: ApplicationId, terms: ContractTerms) -> Result<Contract> {
        let mut tx = self.repos.transactions.begin_transaction().await?;

        let application = tx
            .find_application(application_id)
            .await?
            .ok_or_else(|| AppError::not_found("Application", application_id))?;
        if !application.is_hireable() {
            return Err(AppError::InvalidState(format!(
                "Application {} is {} and cannot be hired",
                application.id, application.status
            )));
        }

        let job = tx
            .find_job(application.job_id)
            .await?
            .ok_or_else(|| AppError::not_found("Job", application.job_id))?;
        if !job.is_open() {
            return Err(AppError::InvalidState(format!(
                "Job {} is {} and cannot take a hire",
                job.id, job.status
            )));
        }

        let new_contract = terms
            .into_draft(job.id, application.talent_id, job.company_id)
            .validate()?;

        tx.set_application_status(application.id, ApplicationStatus::Hired)
            .await?;
        tx.set_job_status(job.id, JobStatus::InProgress).await?;
        let contract = tx.insert_contract(&new_contract).await?;
        tx.commit().await?;

        info!(
            contract_id = contract.id,
            application_id = application.id,
            job_id = job.id,
            talent_id = contract.talent_id,
            total_amount = contract.total_amount,
            "Talent hired"
        );
        Ok(contract)
    }
}

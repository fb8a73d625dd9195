// Contract lifecycle: completion, termination, payments, reviews

use super::MarketplaceService;
use crate::domain::{Contract, ContractId, ContractStatus, JobStatus, Review, ReviewDraft};
use crate::error::{AppError, Result};
use tracing::{info, warn};

impl MarketplaceService {
    /// Close an ACTIVE contract and credit the talent with a finished job
    pub async fn complete_contract(&self, id: ContractId) -> Result<Contract> {
        let mut tx = self.repos.transactions.begin_transaction().await?;

        let contract = tx
            .find_contract(id)
            .await?
            .ok_or_else(|| AppError::not_found("Contract", id))?;
        if contract.status != ContractStatus::Active {
            return Err(AppError::InvalidState(format!(
                "Contract {} is {} and cannot be completed",
                id, contract.status
            )));
        }

        tx.set_contract_status(id, ContractStatus::Completed).await?;
        tx.set_job_status(contract.job_id, JobStatus::Completed)
            .await?;
        tx.increment_jobs_completed(contract.talent_id).await?;
        tx.commit().await?;

        info!(
            contract_id = id,
            job_id = contract.job_id,
            talent_id = contract.talent_id,
            "Contract completed"
        );
        Ok(Contract {
            status: ContractStatus::Completed,
            ..contract
        })
    }

    pub async fn terminate_contract(&self, id: ContractId) -> Result<Contract> {
        let contract = self
            .repos
            .contracts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Contract", id))?;
        if contract.status != ContractStatus::Active {
            return Err(AppError::InvalidState(format!(
                "Contract {} is {} and cannot be terminated",
                id, contract.status
            )));
        }

        self.repos
            .contracts
            .update_status(id, ContractStatus::Terminated)
            .await?;
        warn!(contract_id = id, job_id = contract.job_id, "Contract terminated");
        Ok(Contract {
            status: ContractStatus::Terminated,
            ..contract
        })
    }

    pub async fn record_payment(&self, id: ContractId, amount: f64) -> Result<Contract> {
        let contract = self.repos.contracts.record_payment(id, amount).await?;
        info!(
            contract_id = id,
            amount,
            amount_paid = contract.amount_paid,
            payment_status = %contract.payment_status,
            "Payment recorded"
        );
        Ok(contract)
    }

    /// Rate the other party of a COMPLETED contract
    pub async fn leave_review(&self, draft: ReviewDraft) -> Result<Review> {
        let new_review = draft.validate()?;

        let contract = self
            .repos
            .contracts
            .find_by_id(new_review.contract_id)
            .await?
            .ok_or_else(|| AppError::not_found("Contract", new_review.contract_id))?;
        if contract.status != ContractStatus::Completed {
            return Err(AppError::InvalidState(format!(
                "Contract {} is {}; only completed contracts can be reviewed",
                contract.id, contract.status
            )));
        }
        if contract.counterparty(new_review.reviewer_id) != Some(new_review.reviewee_id) {
            return Err(AppError::Forbidden(format!(
                "Users {} and {} are not the parties of contract {}",
                new_review.reviewer_id, new_review.reviewee_id, contract.id
            )));
        }

        // UNIQUE(contract_id, reviewer_id) rejects a second review as Conflict
        let review = self.repos.reviews.insert(&new_review).await?;
        info!(
            review_id = review.id,
            contract_id = review.contract_id,
            reviewee_id = review.reviewee_id,
            rating = review.rating,
            "Review left"
        );
        Ok(review)
    }
}

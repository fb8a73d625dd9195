// Marketplace Service - use cases over the repository ports

pub mod accounts;
pub mod contracts;
pub mod hiring;
pub mod support;

use crate::domain::{Job, JobSearch, TalentSearch, TalentSummary};
use crate::error::Result;
use crate::port::{
    ApplicationRepository, ContractRepository, JobRepository, PasswordHasher, ReviewRepository,
    TicketRepository, TransactionalMarketplace, UserRepository,
};
use std::sync::Arc;

/// Every persistence port the marketplace needs
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub jobs: Arc<dyn JobRepository>,
    pub applications: Arc<dyn ApplicationRepository>,
    pub contracts: Arc<dyn ContractRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub tickets: Arc<dyn TicketRepository>,
    pub transactions: Arc<dyn TransactionalMarketplace>,
}

/// Marketplace Service
///
/// Validates drafts, checks cross-entity rules (roles, statuses, parties)
/// and delegates persistence to the injected repositories.
pub struct MarketplaceService {
    repos: Repositories,
    hasher: Arc<dyn PasswordHasher>,
}

impl MarketplaceService {
    pub fn new(repos: Repositories, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { repos, hasher }
    }

    pub fn repositories(&self) -> &Repositories {
        &self.repos
    }

    pub async fn search_jobs(&self, search: &JobSearch) -> Result<Vec<Job>> {
        self.repos.jobs.search(search).await
    }

    pub async fn search_talents(&self, search: &TalentSearch) -> Result<Vec<TalentSummary>> {
        self.repos.users.search_talents(search).await
    }
}

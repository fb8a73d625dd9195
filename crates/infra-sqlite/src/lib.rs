// OpSkill Infrastructure - SQLite Adapter
// Implements every repository port, the marketplace transaction and the health check

mod application_repository;
mod connection;
mod contract_repository;
mod error;
mod health_impl;
mod job_repository;
mod migration;
mod review_repository;
mod ticket_repository;
mod transaction;
mod user_repository;

#[cfg(test)]
mod test_support;

pub use application_repository::SqliteApplicationRepository;
pub use connection::create_pool;
pub use contract_repository::SqliteContractRepository;
pub use health_impl::SqliteHealthCheck;
pub use job_repository::SqliteJobRepository;
pub use migration::{current_schema_version, run_migrations};
pub use review_repository::SqliteReviewRepository;
pub use ticket_repository::SqliteTicketRepository;
pub use transaction::{SqliteMarketplaceTransaction, SqliteTransactionManager};
pub use user_repository::SqliteUserRepository;

// Callers hold the pool without depending on sqlx themselves
pub use sqlx::SqlitePool;

use opskill_core::application::Repositories;
use opskill_core::port::TimeProvider;
use std::sync::Arc;

/// Wire every SQLite adapter over one pool
pub fn repositories(pool: &SqlitePool, time_provider: Arc<dyn TimeProvider>) -> Repositories {
    Repositories {
        users: Arc::new(SqliteUserRepository::new(pool.clone(), Arc::clone(&time_provider))),
        jobs: Arc::new(SqliteJobRepository::new(pool.clone(), Arc::clone(&time_provider))),
        applications: Arc::new(SqliteApplicationRepository::new(
            pool.clone(),
            Arc::clone(&time_provider),
        )),
        contracts: Arc::new(SqliteContractRepository::new(
            pool.clone(),
            Arc::clone(&time_provider),
        )),
        reviews: Arc::new(SqliteReviewRepository::new(pool.clone(), Arc::clone(&time_provider))),
        tickets: Arc::new(SqliteTicketRepository::new(pool.clone(), Arc::clone(&time_provider))),
        transactions: Arc::new(SqliteTransactionManager::new(pool.clone(), time_provider)),
    }
}

// Port Layer - Interfaces for external dependencies

pub mod application_repository;
pub mod contract_repository;
pub mod health;
pub mod job_repository;
pub mod password_hasher;
pub mod review_repository;
pub mod ticket_repository;
pub mod time_provider;
pub mod transaction;
pub mod user_repository;

// Re-exports
pub use application_repository::ApplicationRepository;
pub use contract_repository::ContractRepository;
pub use health::{DatabaseHealth, HealthCheck};
pub use job_repository::JobRepository;
pub use password_hasher::{Argon2PasswordHasher, PasswordHasher};
pub use review_repository::ReviewRepository;
pub use ticket_repository::TicketRepository;
pub use time_provider::{FixedTimeProvider, SystemTimeProvider, TimeProvider};
pub use transaction::{MarketplaceTransaction, Transaction, TransactionalMarketplace};
pub use user_repository::UserRepository;

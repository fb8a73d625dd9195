// Application Layer - Use Cases and Business Logic

pub mod health;
pub mod marketplace;

// Re-exports
pub use health::{format_uptime, HealthReport, HealthService, HealthStatus};
pub use marketplace::{MarketplaceService, Repositories};

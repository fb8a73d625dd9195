// Review Repository Port (Interface)

use crate::domain::{ContractId, NewReview, Review, UserId};
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Insert; Conflict if the reviewer already reviewed this contract
    async fn insert(&self, review: &NewReview) -> Result<Review>;

    /// Reviews received by a user
    async fn find_by_reviewee(&self, reviewee_id: UserId) -> Result<Vec<Review>>;

    async fn find_by_contract(&self, contract_id: ContractId) -> Result<Vec<Review>>;
}

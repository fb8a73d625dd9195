// User Repository Port (Interface)

use crate::domain::{NewUser, TalentSearch, TalentSummary, User, UserId, UserUpdate};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for User persistence
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user (email must be unique)
    async fn insert(&self, user: &NewUser) -> Result<User>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>>;

    /// Lookup by normalized (trimmed, lower-cased) email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Apply a partial update; NotFound if the user is gone
    async fn update(&self, id: UserId, update: &UserUpdate) -> Result<User>;

    async fn set_banned(&self, id: UserId, banned: bool) -> Result<()>;

    /// Non-banned talents with rating and completed-contract aggregates
    async fn search_talents(&self, search: &TalentSearch) -> Result<Vec<TalentSummary>>;
}

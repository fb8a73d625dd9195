// Account use cases: registration, profile updates, moderation, credentials

use super::MarketplaceService;
use crate::domain::user::normalize_email;
use crate::domain::{User, UserDraft, UserId, UserUpdate};
use crate::error::{AppError, Result};
use tracing::{info, warn};

const MSG_BAD_CREDENTIALS: &str = "Invalid email or password";

impl MarketplaceService {
    /// Validate, reject duplicate emails, hash the password and insert
    pub async fn register_user(&self, draft: UserDraft) -> Result<User> {
        let validated = draft.validate()?;

        if self
            .repos
            .users
            .find_by_email(&validated.email)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "Email {} is already registered",
                validated.email
            )));
        }

        let password_hash = self.hasher.hash(&validated.password)?;
        let new_user = validated.into_new_user(password_hash);
        let user = self.repos.users.insert(&new_user).await?;

        info!(user_id = user.id, role = %user.role, "User registered");
        Ok(user)
    }

    pub async fn update_profile(&self, id: UserId, update: UserUpdate) -> Result<User> {
        let update = update.validate()?;
        if update.is_empty() {
            return self
                .repos
                .users
                .find_by_id(id)
                .await?
                .ok_or_else(|| AppError::not_found("User", id));
        }
        let user = self.repos.users.update(id, &update).await?;
        info!(user_id = id, "Profile updated");
        Ok(user)
    }

    pub async fn set_banned(&self, id: UserId, banned: bool) -> Result<()> {
        self.repos.users.set_banned(id, banned).await?;
        warn!(user_id = id, banned, "User ban flag changed");
        Ok(())
    }

    /// Check an email/password pair; banned accounts are refused
    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<User> {
        let email = normalize_email(email);
        let user = self
            .repos
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::Forbidden(MSG_BAD_CREDENTIALS.to_string()))?;

        if !self.hasher.verify(password, &user.password_hash)? {
            return Err(AppError::Forbidden(MSG_BAD_CREDENTIALS.to_string()));
        }
        if user.is_banned {
            return Err(AppError::Forbidden("Your account has been banned".to_string()));
        }
        Ok(user)
    }
}

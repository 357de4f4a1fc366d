use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::repo_tx::StorageTx;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CredentialRecord {
    pub user_id: UserId,
    pub email: String,
    pub password_hash: String,
    pub reset_token_hash: Option<String>,
    pub reset_token_expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[async_trait::async_trait]
pub trait AuthRepo: Send + Sync {
    /// Insert a credential row. The `user_id` row must already exist (FK).
    async fn create_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_id: UserId,
        email: &str,
        password_hash: &str,
    ) -> Result<(), AuthError>;

    /// Fetch credentials by email (for login).
    async fn get_by_email(&self, email: &str) -> Result<Option<CredentialRecord>, AuthError>;

    async fn get_by_user_id(&self, user_id: UserId) -> Result<Option<CredentialRecord>, AuthError>;

    async fn email_exists(&self, email: &str) -> Result<bool, AuthError>;

    /// Record the digest of an outstanding reset token; replaces any previous one.
    async fn set_reset_token(
        &self,
        user_id: UserId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError>;

    async fn get_by_reset_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<CredentialRecord>, AuthError>;

    /// Update the password hash and clear the reset token in one write.
    async fn update_password(&self, user_id: UserId, password_hash: &str)
    -> Result<(), AuthError>;

    /// Drop reset tokens whose expiry has passed. Returns how many were cleared.
    async fn clear_expired_reset_tokens(&self, now: DateTime<Utc>) -> Result<u64, AuthError>;
}

use super::db::MemoryDb;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use std::sync::Arc;

pub struct MemoryAuthRepo {
    db: Arc<MemoryDb>,
}

impl MemoryAuthRepo {
    pub fn new(db: Arc<MemoryDb>) -> Self {
        MemoryAuthRepo { db }
    }
}

#[async_trait::async_trait]
impl AuthRepo for MemoryAuthRepo {
    async fn create_in_tx<'t>(
        &self,
        _tx: &mut dyn StorageTx<'t>,
        user_id: UserId,
        email: &str,
        password_hash: &str,
    ) -> Result<(), AuthError> {
        match self.db.emails.entry(email.to_string()) {
            Entry::Occupied(_) => Err(AuthError::EmailTaken),
            Entry::Vacant(slot) => {
                slot.insert(user_id);
                self.db.credentials.insert(
                    user_id,
                    CredentialRecord {
                        user_id,
                        email: email.to_string(),
                        password_hash: password_hash.to_string(),
                        reset_token_hash: None,
                        reset_token_expires_at: None,
                        is_active: true,
                        created_at: Utc::now(),
                    },
                );
                Ok(())
            }
        }
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<CredentialRecord>, AuthError> {
        let Some(user_id) = self.db.emails.get(email).map(|id| *id) else {
            return Ok(None);
        };

        Ok(self.db.credentials.get(&user_id).map(|c| c.clone()))
    }

    async fn get_by_user_id(&self, user_id: UserId) -> Result<Option<CredentialRecord>, AuthError> {
        Ok(self.db.credentials.get(&user_id).map(|c| c.clone()))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AuthError> {
        Ok(self.db.emails.contains_key(email))
    }

    async fn set_reset_token(
        &self,
        user_id: UserId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        let Some(mut cred) = self.db.credentials.get_mut(&user_id) else {
            return Err(AuthError::UserNotFound);
        };

        cred.reset_token_hash = Some(token_hash.to_string());
        cred.reset_token_expires_at = Some(expires_at);
        Ok(())
    }

    async fn get_by_reset_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<CredentialRecord>, AuthError> {
        Ok(self
            .db
            .credentials
            .iter()
            .find(|c| c.reset_token_hash.as_deref() == Some(token_hash))
            .map(|c| c.clone()))
    }

    async fn update_password(
        &self,
        user_id: UserId,
        password_hash: &str,
    ) -> Result<(), AuthError> {
        let Some(mut cred) = self.db.credentials.get_mut(&user_id) else {
            return Err(AuthError::UserNotFound);
        };

        cred.password_hash = password_hash.to_string();
        cred.reset_token_hash = None;
        cred.reset_token_expires_at = None;
        Ok(())
    }

    async fn clear_expired_reset_tokens(&self, now: DateTime<Utc>) -> Result<u64, AuthError> {
        let mut cleared = 0;
        for mut cred in self.db.credentials.iter_mut() {
            let expired = matches!(cred.reset_token_expires_at, Some(at) if at < now);
            if expired {
                cred.reset_token_hash = None;
                cred.reset_token_expires_at = None;
                cleared += 1;
            }
        }

        Ok(cleared)
    }
}

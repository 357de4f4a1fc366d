use super::util::{downcast, is_dup_key};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;

pub struct MySqlAuthRepo {
    pool: MySqlPool,
}

impl MySqlAuthRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlAuthRepo { pool }
    }
}

const CREDENTIAL_COLUMNS: &str = r#"
SELECT user_id, email, password_hash, reset_token_hash, reset_token_expires_at,
       is_active, created_at
FROM auth_credential
"#;

#[async_trait::async_trait]
impl AuthRepo for MySqlAuthRepo {
    async fn create_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_id: UserId,
        email: &str,
        password_hash: &str,
    ) -> Result<(), AuthError> {
        let tx = downcast(tx);

        sqlx::query(
            r#"
INSERT INTO auth_credential (user_id, email, password_hash)
VALUES (?, ?, ?)
"#,
        )
        .bind(user_id)
        .bind(email)
        .bind(password_hash)
        .execute(tx.conn())
        .await
        .map_err(|e| {
            if is_dup_key(&e) {
                AuthError::EmailTaken
            } else {
                AuthError::Store(e.to_string())
            }
        })?;

        Ok(())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<CredentialRecord>, AuthError> {
        sqlx::query_as::<_, CredentialRecord>(&format!("{CREDENTIAL_COLUMNS} WHERE email = ?"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))
    }

    async fn get_by_user_id(&self, user_id: UserId) -> Result<Option<CredentialRecord>, AuthError> {
        sqlx::query_as::<_, CredentialRecord>(&format!("{CREDENTIAL_COLUMNS} WHERE user_id = ?"))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AuthError> {
        let count: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM auth_credential WHERE email = ?"#)
                .bind(email)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AuthError::Store(e.to_string()))?;

        Ok(count > 0)
    }

    async fn set_reset_token(
        &self,
        user_id: UserId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        let result = sqlx::query(
            r#"
UPDATE auth_credential
SET reset_token_hash = ?, reset_token_expires_at = ?
WHERE user_id = ?
"#,
        )
        .bind(token_hash)
        .bind(expires_at)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::Store(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AuthError::UserNotFound);
        }

        Ok(())
    }

    async fn get_by_reset_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<CredentialRecord>, AuthError> {
        sqlx::query_as::<_, CredentialRecord>(&format!(
            "{CREDENTIAL_COLUMNS} WHERE reset_token_hash = ?"
        ))
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Store(e.to_string()))
    }

    async fn update_password(
        &self,
        user_id: UserId,
        password_hash: &str,
    ) -> Result<(), AuthError> {
        let result = sqlx::query(
            r#"
UPDATE auth_credential
SET password_hash = ?, reset_token_hash = NULL, reset_token_expires_at = NULL
WHERE user_id = ?
"#,
        )
        .bind(password_hash)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::Store(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AuthError::UserNotFound);
        }

        Ok(())
    }

    async fn clear_expired_reset_tokens(&self, now: DateTime<Utc>) -> Result<u64, AuthError> {
        let result = sqlx::query(
            r#"
UPDATE auth_credential
SET reset_token_hash = NULL, reset_token_expires_at = NULL
WHERE reset_token_expires_at IS NOT NULL AND reset_token_expires_at < ?
"#,
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::Store(e.to_string()))?;

        Ok(result.rows_affected())
    }
}

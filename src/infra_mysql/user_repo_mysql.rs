use super::util::{downcast, is_dup_key};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use sqlx::MySqlPool;

pub struct MySqlUserRepo {
    pool: MySqlPool,
}

impl MySqlUserRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlUserRepo { pool }
    }
}

#[async_trait::async_trait]
impl UserRepo for MySqlUserRepo {
    async fn create_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        username: &str,
    ) -> Result<UserId, AuthError> {
        let tx = downcast(tx);

        let result = sqlx::query(
            r#"
INSERT INTO user (username, is_active)
VALUES (?, ?)
"#,
        )
        .bind(username)
        .bind(true)
        .execute(tx.conn())
        .await
        .map_err(|e| {
            if is_dup_key(&e) {
                AuthError::UsernameTaken
            } else {
                AuthError::Store(e.to_string())
            }
        })?;

        Ok(UserId(result.last_insert_id() as i64))
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<UserRecord>, AuthError> {
        sqlx::query_as::<_, UserRecord>(
            r#"
SELECT user_id, username, first_name, last_name, city, state, country,
       profile_picture_url, birth_date, is_active, created_at
FROM user
WHERE username = ? AND is_active = 1
"#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Store(e.to_string()))
    }

    async fn username_exists(&self, username: &str) -> Result<bool, AuthError> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM user WHERE username = ?"#)
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;

        Ok(count > 0)
    }

    async fn id_exists(&self, user_id: UserId) -> Result<bool, AuthError> {
        let count: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(1) FROM user WHERE user_id = ? AND is_active = 1"#)
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AuthError::Store(e.to_string()))?;

        Ok(count > 0)
    }

    async fn update_profile(
        &self,
        user_id: UserId,
        changes: &ProfileUpdate,
    ) -> Result<(), AuthError> {
        // COALESCE keeps columns the caller left out; absent fields arrive as None.
        let result = sqlx::query(
            r#"
UPDATE user
SET first_name = COALESCE(?, first_name),
    last_name = COALESCE(?, last_name),
    city = COALESCE(?, city),
    state = COALESCE(?, state),
    country = COALESCE(?, country),
    profile_picture_url = COALESCE(?, profile_picture_url),
    birth_date = COALESCE(?, birth_date)
WHERE user_id = ? AND is_active = 1
"#,
        )
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .bind(&changes.city)
        .bind(&changes.state)
        .bind(&changes.country)
        .bind(&changes.profile_picture_url)
        .bind(changes.birth_date)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::Store(e.to_string()))?;

        if result.rows_affected() == 0 {
            // Either unknown id or a no-change update; re-check to tell them apart.
            if !self.id_exists(user_id).await? {
                return Err(AuthError::UserNotFound);
            }
        }

        Ok(())
    }
}

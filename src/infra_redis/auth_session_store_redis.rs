use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

/// Refresh sessions live under `{prefix}:{jti}` with the owning user id as
/// the value and the refresh TTL as the key expiry, so abandoned sessions
/// age out on their own.
pub struct RedisAuthSessionStore {
    conn: ConnectionManager,
    prefix: String,
}

impl RedisAuthSessionStore {
    pub fn new(conn: redis::aio::ConnectionManager, prefix: impl Into<String>) -> Self {
        RedisAuthSessionStore {
            conn,
            prefix: prefix.into(),
        }
    }

    fn key(&self, jti: &str) -> String {
        format!("{}:{}", self.prefix, jti)
    }
}

#[async_trait::async_trait]
impl AuthSessionStore for RedisAuthSessionStore {
    async fn save_refresh_jti(
        &self,
        user_id: UserId,
        jti: &str,
        ttl_secs: u64,
    ) -> Result<(), AuthError> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(self.key(jti), user_id.0, ttl_secs)
            .await
            .map_err(|e| AuthError::Store(format!("session save: {e}")))?;

        Ok(())
    }

    async fn check_refresh_jti(
        &self,
        _user_id: UserId,
        jti: &str,
        consume: bool,
    ) -> Result<Option<UserId>, AuthError> {
        let key = self.key(jti);
        let mut conn = self.conn.clone();

        // GETDEL makes consumption a single round trip; of two racing
        // rotations only one gets the value back.
        let stored: Option<i64> = if consume {
            conn.get_del(&key).await
        } else {
            conn.get(&key).await
        }
        .map_err(|e| AuthError::Store(format!("session check: {e}")))?;

        Ok(stored.map(UserId))
    }
}

use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use dashmap::DashMap;
use std::time::Duration;
use tokio::time::Instant;

pub struct MemoryAuthSessionStore {
    sessions: DashMap<String, (UserId, Instant)>,
}

impl MemoryAuthSessionStore {
    pub fn new() -> Self {
        MemoryAuthSessionStore {
            sessions: DashMap::new(),
        }
    }
}

impl Default for MemoryAuthSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AuthSessionStore for MemoryAuthSessionStore {
    async fn save_refresh_jti(
        &self,
        user_id: UserId,
        jti: &str,
        ttl_secs: u64,
    ) -> Result<(), AuthError> {
        let expires_at = Instant::now() + Duration::from_secs(ttl_secs);
        self.sessions.insert(jti.to_string(), (user_id, expires_at));
        Ok(())
    }

    async fn check_refresh_jti(
        &self,
        _user_id: UserId,
        jti: &str,
        consume: bool,
    ) -> Result<Option<UserId>, AuthError> {
        if consume {
            // remove() is the atomic step; of two concurrent rotations only
            // one gets the entry back.
            let Some((_, (user_id, expires_at))) = self.sessions.remove(jti) else {
                return Ok(None);
            };
            if Instant::now() >= expires_at {
                return Ok(None);
            }
            return Ok(Some(user_id));
        }

        let Some(entry) = self.sessions.get(jti) else {
            return Ok(None);
        };
        let (user_id, expires_at) = *entry;
        if Instant::now() >= expires_at {
            return Ok(None);
        }

        Ok(Some(user_id))
    }
}

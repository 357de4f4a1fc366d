use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::time::Duration;

/// Feed cache backed by a single redis string key holding the serialized
/// feed. A fresh `put_feed` overwrites whatever is there, so a bad entry
/// heals on the next rebuild.
pub struct RedisPostCache {
    conn: ConnectionManager,
    key: String,
}

impl RedisPostCache {
    pub fn new(conn: redis::aio::ConnectionManager, prefix: impl Into<String>) -> Self {
        RedisPostCache {
            conn,
            key: format!("{}:feed", prefix.into()),
        }
    }
}

#[async_trait::async_trait]
impl PostCache for RedisPostCache {
    async fn get_feed(&self) -> Result<Option<Vec<PostSummary>>, PostError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .get(&self.key)
            .await
            .map_err(|e| PostError::Store(format!("feed cache get: {e}")))?;

        match raw {
            Some(json) => {
                let feed = serde_json::from_str(&json)
                    .map_err(|e| PostError::Store(format!("feed cache decode: {e}")))?;
                Ok(Some(feed))
            }
            None => Ok(None),
        }
    }

    async fn put_feed(&self, feed: &[PostSummary], ttl: Duration) -> Result<(), PostError> {
        let json = serde_json::to_string(feed)
            .map_err(|e| PostError::Store(format!("feed cache encode: {e}")))?;
        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(&self.key, json, ttl.as_secs())
            .await
            .map_err(|e| PostError::Store(format!("feed cache set: {e}")))?;
        Ok(())
    }

    async fn invalidate(&self) -> Result<(), PostError> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .del(&self.key)
            .await
            .map_err(|e| PostError::Store(format!("feed cache del: {e}")))?;
        Ok(())
    }
}

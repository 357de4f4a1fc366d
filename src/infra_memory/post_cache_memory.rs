use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Single-slot feed cache. Expiry runs on the tokio clock, so tests can
/// drive it with `tokio::time::pause` and `advance`.
pub struct MemoryPostCache {
    slot: Mutex<Option<(Instant, Vec<PostSummary>)>>,
}

impl MemoryPostCache {
    pub fn new() -> Self {
        MemoryPostCache {
            slot: Mutex::new(None),
        }
    }
}

impl Default for MemoryPostCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl PostCache for MemoryPostCache {
    async fn get_feed(&self) -> Result<Option<Vec<PostSummary>>, PostError> {
        let mut slot = self.slot.lock().await;
        match slot.as_ref() {
            Some((deadline, feed)) if Instant::now() < *deadline => Ok(Some(feed.clone())),
            Some(_) => {
                *slot = None;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put_feed(&self, feed: &[PostSummary], ttl: Duration) -> Result<(), PostError> {
        let mut slot = self.slot.lock().await;
        *slot = Some((Instant::now() + ttl, feed.to_vec()));
        Ok(())
    }

    async fn invalidate(&self) -> Result<(), PostError> {
        let mut slot = self.slot.lock().await;
        *slot = None;
        Ok(())
    }
}

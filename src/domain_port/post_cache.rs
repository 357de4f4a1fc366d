use crate::application_port::*;
use crate::domain_model::*;
use std::time::Duration;

/// Read-through cache for the assembled feed.
///
/// Misses and errors are equivalent to the caller; the store of record is
/// always the post repo.
#[async_trait::async_trait]
pub trait PostCache: Send + Sync {
    async fn get_feed(&self) -> Result<Option<Vec<PostSummary>>, PostError>;

    async fn put_feed(&self, feed: &[PostSummary], ttl: Duration) -> Result<(), PostError>;

    async fn invalidate(&self) -> Result<(), PostError>;
}

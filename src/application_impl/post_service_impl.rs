use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use std::sync::Arc;
use std::time::Duration;

pub struct RealPostService {
    post_repo: Arc<dyn PostRepo>,
    post_cache: Arc<dyn PostCache>,
    feed_ttl: Duration,
}

impl RealPostService {
    pub fn new(
        post_repo: Arc<dyn PostRepo>,
        post_cache: Arc<dyn PostCache>,
        feed_ttl: Duration,
    ) -> Self {
        Self {
            post_repo,
            post_cache,
            feed_ttl,
        }
    }

    /// The repo is the store of record; a cache that errors only costs the
    /// shortcut, never the request.
    async fn drop_cached_feed(&self) {
        if let Err(e) = self.post_cache.invalidate().await {
            tracing::warn!(error = %e, "feed cache invalidation failed");
        }
    }
}

#[async_trait::async_trait]
impl PostService for RealPostService {
    async fn create_post(
        &self,
        author: UserId,
        caption: &str,
        image_url: Option<&str>,
    ) -> Result<PostId, PostError> {
        let post_id = self.post_repo.insert(author, caption, image_url).await?;
        self.drop_cached_feed().await;

        tracing::info!(%post_id, user_id = %author, "post created");

        Ok(post_id)
    }

    async fn delete_post(&self, actor: UserId, post_id: PostId) -> Result<(), PostError> {
        let author = self
            .post_repo
            .author_of(post_id)
            .await?
            .ok_or(PostError::PostNotFound)?;
        if author != actor {
            return Err(PostError::NotOwner);
        }

        self.post_repo.delete(post_id).await?;
        self.drop_cached_feed().await;

        tracing::info!(%post_id, user_id = %actor, "post deleted");

        Ok(())
    }

    async fn feed(&self) -> Result<Vec<PostSummary>, PostError> {
        match self.post_cache.get_feed().await {
            Ok(Some(feed)) => return Ok(feed),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "feed cache read failed"),
        }

        let feed = self.post_repo.scan_feed().await?;

        if let Err(e) = self.post_cache.put_feed(&feed, self.feed_ttl).await {
            tracing::warn!(error = %e, "feed cache write failed");
        }

        Ok(feed)
    }
}

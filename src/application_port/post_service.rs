use crate::domain_model::{PostId, PostSummary, UserId};

#[derive(Debug, thiserror::Error)]
pub enum PostError {
    #[error("post not found")]
    PostNotFound,
    #[error("not the post owner")]
    NotOwner,
    #[error("store error: {0}")]
    Store(String),
}

#[async_trait::async_trait]
pub trait PostService: Send + Sync {
    async fn create_post(
        &self,
        author: UserId,
        caption: &str,
        image_url: Option<&str>,
    ) -> Result<PostId, PostError>;

    /// Only the author may delete their post.
    async fn delete_post(&self, actor: UserId, post_id: PostId) -> Result<(), PostError>;

    /// The shared feed, newest first. Served from the cache when a fresh
    /// snapshot exists.
    async fn feed(&self) -> Result<Vec<PostSummary>, PostError>;
}

use crate::application_port::*;
use crate::domain_model::*;

#[async_trait::async_trait]
pub trait PostRepo: Send + Sync {
    /// Insert a post and return the generated id.
    async fn insert(
        &self,
        author: UserId,
        caption: &str,
        image_url: Option<&str>,
    ) -> Result<PostId, PostError>;

    async fn author_of(&self, post_id: PostId) -> Result<Option<UserId>, PostError>;

    async fn delete(&self, post_id: PostId) -> Result<(), PostError>;

    /// Every post joined with its author's username, newest first.
    async fn scan_feed(&self) -> Result<Vec<PostSummary>, PostError>;
}

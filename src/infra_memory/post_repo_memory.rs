use super::db::{MemoryDb, PostRow};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::Utc;
use std::sync::Arc;

pub struct MemoryPostRepo {
    db: Arc<MemoryDb>,
}

impl MemoryPostRepo {
    pub fn new(db: Arc<MemoryDb>) -> Self {
        MemoryPostRepo { db }
    }
}

#[async_trait::async_trait]
impl PostRepo for MemoryPostRepo {
    async fn insert(
        &self,
        author: UserId,
        caption: &str,
        image_url: Option<&str>,
    ) -> Result<PostId, PostError> {
        let post_id = self.db.allocate_post_id();
        self.db.posts.insert(
            post_id,
            PostRow {
                post_id,
                user_id: author,
                caption: caption.to_string(),
                image_url: image_url.map(str::to_string),
                created_at: Utc::now(),
            },
        );

        Ok(post_id)
    }

    async fn author_of(&self, post_id: PostId) -> Result<Option<UserId>, PostError> {
        Ok(self.db.posts.get(&post_id).map(|p| p.user_id))
    }

    async fn delete(&self, post_id: PostId) -> Result<(), PostError> {
        match self.db.posts.remove(&post_id) {
            Some(_) => Ok(()),
            None => Err(PostError::PostNotFound),
        }
    }

    async fn scan_feed(&self) -> Result<Vec<PostSummary>, PostError> {
        let mut out: Vec<PostSummary> = self
            .db
            .posts
            .iter()
            .filter_map(|p| {
                // Drop rows whose author is gone, same as an inner join would.
                let username = self.db.users.get(&p.user_id).map(|u| u.username.clone())?;
                Some(PostSummary {
                    post_id: p.post_id,
                    user_id: p.user_id,
                    username,
                    caption: p.caption.clone(),
                    image_url: p.image_url.clone(),
                    created_at: p.created_at,
                })
            })
            .collect();

        out.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.post_id.0.cmp(&a.post_id.0))
        });
        Ok(out)
    }
}

use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};

/// Post row as stored; the author's username is joined in at read time.
#[derive(Debug, Clone)]
pub struct PostRow {
    pub post_id: PostId,
    pub user_id: UserId,
    pub caption: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Shared in-process tables. Every memory repo holds an `Arc` of this, so
/// the backend behaves like one database rather than per-repo islands.
pub struct MemoryDb {
    pub(super) users: DashMap<UserId, UserRecord>,
    pub(super) usernames: DashMap<String, UserId>,
    pub(super) credentials: DashMap<UserId, CredentialRecord>,
    pub(super) emails: DashMap<String, UserId>,
    pub(super) relationships: DashMap<(UserId, UserId), Relationship>,
    pub(super) posts: DashMap<PostId, PostRow>,
    next_user_id: AtomicI64,
    next_post_id: AtomicI64,
}

impl MemoryDb {
    pub fn new() -> Self {
        MemoryDb {
            users: DashMap::new(),
            usernames: DashMap::new(),
            credentials: DashMap::new(),
            emails: DashMap::new(),
            relationships: DashMap::new(),
            posts: DashMap::new(),
            next_user_id: AtomicI64::new(1),
            next_post_id: AtomicI64::new(1),
        }
    }

    pub(super) fn allocate_user_id(&self) -> UserId {
        UserId(self.next_user_id.fetch_add(1, Ordering::SeqCst))
    }

    pub(super) fn allocate_post_id(&self) -> PostId {
        PostId(self.next_post_id.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for MemoryDb {
    fn default() -> Self {
        Self::new()
    }
}

use crate::domain_model::*;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum RelationError {
    #[error("user not found")]
    UnknownUser,
    #[error("relationship not found")]
    RelationshipNotFound,
    #[error("relationship already exists for this pair")]
    DuplicateRelationship,
    #[error("unknown relationship action: {0}")]
    InvalidAction(String),
    #[error("not permitted to act on this relationship")]
    Unauthorized,
    #[error("store error: {0}")]
    Store(String),
}

/// What a transition left behind: an updated row, or nothing (cancel
/// removes the pair row).
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RespondOutcome {
    Transitioned(Relationship),
    Removed,
}

#[async_trait::async_trait]
pub trait RelationshipService: Send + Sync {
    /// Create a pending request from `me` to `other`.
    async fn send_request(&self, me: UserId, other: UserId) -> Result<Relationship, RelationError>;

    /// Apply an action verb (`accept`/`reject`/`cancel`/`block`) to the
    /// relationship between `me` and `other`, whichever side initiated it.
    async fn respond(
        &self,
        me: UserId,
        other: UserId,
        action: &str,
    ) -> Result<RespondOutcome, RelationError>;

    async fn list_friends(&self, me: UserId) -> Result<Vec<FriendSummary>, RelationError>;

    async fn list_pending(&self, me: UserId) -> Result<Vec<PendingRequestSummary>, RelationError>;
}

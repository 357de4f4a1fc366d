use crate::application_port::*;
use crate::domain_model::*;

/// Storage of the single canonical row per user pair.
///
/// All operations address a pair through [`UserPair`], so callers may pass
/// the two ids in either order.
#[async_trait::async_trait]
pub trait RelationshipRepo: Send + Sync {
    /// Insert a pending row for the pair, recording `requested_by` as the
    /// initiator. Fails with `DuplicateRelationship` if any row for the pair
    /// already exists, whatever its status.
    async fn create_pending(
        &self,
        pair: UserPair,
        requested_by: UserId,
    ) -> Result<Relationship, RelationError>;

    async fn get_by_pair(&self, pair: UserPair) -> Result<Option<Relationship>, RelationError>;

    /// Set the status of an existing row and stamp `actor` as the last one
    /// to act on it. Returns the row as stored afterwards.
    async fn update_status(
        &self,
        pair: UserPair,
        actor: UserId,
        status: RelationshipStatus,
    ) -> Result<Relationship, RelationError>;

    /// Delete the pair's row. Fails with `RelationshipNotFound` if absent.
    async fn remove(&self, pair: UserPair) -> Result<(), RelationError>;

    /// Accepted friends of `user_id`, newest friendship first.
    async fn list_friends(&self, user_id: UserId) -> Result<Vec<FriendSummary>, RelationError>;

    /// Pending rows touching `user_id`, tagged incoming or outgoing.
    async fn list_pending(
        &self,
        user_id: UserId,
    ) -> Result<Vec<PendingRequestSummary>, RelationError>;
}

use super::db::MemoryDb;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;

pub struct MemoryRelationshipRepo {
    db: Arc<MemoryDb>,
}

impl MemoryRelationshipRepo {
    pub fn new(db: Arc<MemoryDb>) -> Self {
        MemoryRelationshipRepo { db }
    }

    fn username_of(&self, user_id: UserId) -> Option<String> {
        self.db.users.get(&user_id).map(|u| u.username.clone())
    }
}

#[async_trait::async_trait]
impl RelationshipRepo for MemoryRelationshipRepo {
    async fn create_pending(
        &self,
        pair: UserPair,
        requested_by: UserId,
    ) -> Result<Relationship, RelationError> {
        // Entry claim keeps the pair unique under concurrent requests; the
        // second caller lands on Occupied whichever order the ids came in.
        match self.db.relationships.entry((pair.min(), pair.max())) {
            Entry::Occupied(_) => Err(RelationError::DuplicateRelationship),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let rel = Relationship {
                    user_min: pair.min(),
                    user_max: pair.max(),
                    action_user_id: requested_by,
                    status: RelationshipStatus::Pending,
                    created_at: now,
                    updated_at: now,
                };
                slot.insert(rel.clone());
                Ok(rel)
            }
        }
    }

    async fn get_by_pair(&self, pair: UserPair) -> Result<Option<Relationship>, RelationError> {
        Ok(self
            .db
            .relationships
            .get(&(pair.min(), pair.max()))
            .map(|r| r.clone()))
    }

    async fn update_status(
        &self,
        pair: UserPair,
        actor: UserId,
        status: RelationshipStatus,
    ) -> Result<Relationship, RelationError> {
        let Some(mut rel) = self.db.relationships.get_mut(&(pair.min(), pair.max())) else {
            return Err(RelationError::RelationshipNotFound);
        };

        rel.status = status;
        rel.action_user_id = actor;
        rel.updated_at = Utc::now();
        Ok(rel.clone())
    }

    async fn remove(&self, pair: UserPair) -> Result<(), RelationError> {
        match self.db.relationships.remove(&(pair.min(), pair.max())) {
            Some(_) => Ok(()),
            None => Err(RelationError::RelationshipNotFound),
        }
    }

    async fn list_friends(&self, user_id: UserId) -> Result<Vec<FriendSummary>, RelationError> {
        let mut out: Vec<FriendSummary> = self
            .db
            .relationships
            .iter()
            .filter(|r| r.status == RelationshipStatus::Friend && r.involves(user_id))
            .filter_map(|r| {
                let other = r.other(user_id)?;
                Some(FriendSummary {
                    user_id: other,
                    username: self.username_of(other)?,
                    since: r.updated_at,
                })
            })
            .collect();

        out.sort_by(|a, b| b.since.cmp(&a.since).then_with(|| a.username.cmp(&b.username)));
        Ok(out)
    }

    async fn list_pending(
        &self,
        user_id: UserId,
    ) -> Result<Vec<PendingRequestSummary>, RelationError> {
        let mut out: Vec<PendingRequestSummary> = self
            .db
            .relationships
            .iter()
            .filter(|r| r.status == RelationshipStatus::Pending && r.involves(user_id))
            .filter_map(|r| {
                let other = r.other(user_id)?;
                Some(PendingRequestSummary {
                    user_id: other,
                    username: self.username_of(other)?,
                    direction: if r.action_user_id == user_id {
                        RequestDirection::Outgoing
                    } else {
                        RequestDirection::Incoming
                    },
                    requested_at: r.created_at,
                })
            })
            .collect();

        out.sort_by(|a, b| {
            b.requested_at
                .cmp(&a.requested_at)
                .then_with(|| a.username.cmp(&b.username))
        });
        Ok(out)
    }
}

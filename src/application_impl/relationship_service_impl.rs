use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use std::sync::Arc;

pub struct RealRelationshipService {
    user_repo: Arc<dyn UserRepo>,
    relationship_repo: Arc<dyn RelationshipRepo>,
}

impl RealRelationshipService {
    pub fn new(user_repo: Arc<dyn UserRepo>, relationship_repo: Arc<dyn RelationshipRepo>) -> Self {
        Self {
            user_repo,
            relationship_repo,
        }
    }

    /// Screens an action against the current row before any write happens.
    ///
    /// Two rules only. A blocked row belongs to the blocker: nobody else may
    /// act on it. A pending request is answered by the side that did not send
    /// it; the sender can still cancel or block. Everything else is open to
    /// either participant, which keeps repeats of a settling action (a second
    /// reject, a second accept) harmless.
    fn authorize(
        rel: &Relationship,
        actor: UserId,
        action: FriendAction,
    ) -> Result<(), RelationError> {
        if rel.status == RelationshipStatus::Blocked && rel.action_user_id != actor {
            return Err(RelationError::Unauthorized);
        }

        if matches!(action, FriendAction::Accept | FriendAction::Reject)
            && rel.status == RelationshipStatus::Pending
            && rel.action_user_id == actor
        {
            return Err(RelationError::Unauthorized);
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl RelationshipService for RealRelationshipService {
    async fn send_request(&self, me: UserId, other: UserId) -> Result<Relationship, RelationError> {
        if me == other {
            return Err(RelationError::Unauthorized);
        }

        let exists = self
            .user_repo
            .id_exists(other)
            .await
            .map_err(|e| RelationError::Store(e.to_string()))?;
        if !exists {
            return Err(RelationError::UnknownUser);
        }

        let rel = self
            .relationship_repo
            .create_pending(UserPair::new(me, other), me)
            .await?;

        tracing::info!(from = %me, to = %other, "friend request created");

        Ok(rel)
    }

    async fn respond(
        &self,
        me: UserId,
        other: UserId,
        action: &str,
    ) -> Result<RespondOutcome, RelationError> {
        let action = action
            .parse::<FriendAction>()
            .map_err(RelationError::InvalidAction)?;

        if me == other {
            return Err(RelationError::Unauthorized);
        }

        let pair = UserPair::new(me, other);
        let rel = self
            .relationship_repo
            .get_by_pair(pair)
            .await?
            .ok_or(RelationError::RelationshipNotFound)?;

        Self::authorize(&rel, me, action)?;

        match action.target_status() {
            Some(status) => {
                let updated = self.relationship_repo.update_status(pair, me, status).await?;
                tracing::info!(
                    actor = %me,
                    other = %other,
                    %action,
                    status = ?updated.status,
                    "relationship transitioned"
                );
                Ok(RespondOutcome::Transitioned(updated))
            }
            None => {
                self.relationship_repo.remove(pair).await?;
                tracing::info!(actor = %me, other = %other, %action, "relationship removed");
                Ok(RespondOutcome::Removed)
            }
        }
    }

    async fn list_friends(&self, me: UserId) -> Result<Vec<FriendSummary>, RelationError> {
        self.relationship_repo.list_friends(me).await
    }

    async fn list_pending(&self, me: UserId) -> Result<Vec<PendingRequestSummary>, RelationError> {
        self.relationship_repo.list_pending(me).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row(status: RelationshipStatus, action_user: UserId) -> Relationship {
        Relationship {
            user_min: UserId(1),
            user_max: UserId(2),
            action_user_id: action_user,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn initiator_cannot_answer_own_request() {
        let rel = row(RelationshipStatus::Pending, UserId(1));

        assert!(matches!(
            RealRelationshipService::authorize(&rel, UserId(1), FriendAction::Accept),
            Err(RelationError::Unauthorized)
        ));
        assert!(matches!(
            RealRelationshipService::authorize(&rel, UserId(1), FriendAction::Reject),
            Err(RelationError::Unauthorized)
        ));
    }

    #[test]
    fn recipient_may_answer_and_initiator_may_cancel_or_block() {
        let rel = row(RelationshipStatus::Pending, UserId(1));

        assert!(RealRelationshipService::authorize(&rel, UserId(2), FriendAction::Accept).is_ok());
        assert!(RealRelationshipService::authorize(&rel, UserId(2), FriendAction::Reject).is_ok());
        assert!(RealRelationshipService::authorize(&rel, UserId(1), FriendAction::Cancel).is_ok());
        assert!(RealRelationshipService::authorize(&rel, UserId(1), FriendAction::Block).is_ok());
    }

    #[test]
    fn blocked_row_is_owned_by_the_blocker() {
        let rel = row(RelationshipStatus::Blocked, UserId(2));

        for action in [
            FriendAction::Accept,
            FriendAction::Reject,
            FriendAction::Cancel,
            FriendAction::Block,
        ] {
            assert!(matches!(
                RealRelationshipService::authorize(&rel, UserId(1), action),
                Err(RelationError::Unauthorized)
            ));
        }

        assert!(RealRelationshipService::authorize(&rel, UserId(2), FriendAction::Cancel).is_ok());
    }

    #[test]
    fn settled_rows_accept_repeat_actions() {
        let rejected = row(RelationshipStatus::Rejected, UserId(2));
        assert!(
            RealRelationshipService::authorize(&rejected, UserId(2), FriendAction::Reject).is_ok()
        );

        let friends = row(RelationshipStatus::Friend, UserId(2));
        assert!(
            RealRelationshipService::authorize(&friends, UserId(1), FriendAction::Block).is_ok()
        );
        assert!(
            RealRelationshipService::authorize(&friends, UserId(2), FriendAction::Cancel).is_ok()
        );
    }
}

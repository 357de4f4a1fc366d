use super::util::is_dup_key;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;

pub struct MySqlRelationshipRepo {
    pool: MySqlPool,
}

impl MySqlRelationshipRepo {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn fetch_pair(&self, pair: UserPair) -> Result<Option<Relationship>, RelationError> {
        sqlx::query_as::<_, Relationship>(
            r#"
SELECT user_min, user_max, action_user_id, status, created_at, updated_at
FROM relationship
WHERE user_min = ? AND user_max = ?
"#,
        )
        .bind(pair.min())
        .bind(pair.max())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RelationError::Store(format!("select relationship: {e}")))
    }
}

#[async_trait::async_trait]
impl RelationshipRepo for MySqlRelationshipRepo {
    async fn create_pending(
        &self,
        pair: UserPair,
        requested_by: UserId,
    ) -> Result<Relationship, RelationError> {
        let res = sqlx::query(
            r#"
INSERT INTO relationship (user_min, user_max, action_user_id, status)
VALUES (?, ?, ?, ?)
"#,
        )
        .bind(pair.min())
        .bind(pair.max())
        .bind(requested_by)
        .bind(RelationshipStatus::Pending)
        .execute(&self.pool)
        .await;

        match res {
            Ok(_) => {}
            Err(e) if is_dup_key(&e) => return Err(RelationError::DuplicateRelationship),
            Err(e) => return Err(RelationError::Store(format!("insert relationship: {e}"))),
        }

        self.fetch_pair(pair)
            .await?
            .ok_or_else(|| RelationError::Store("relationship row missing after insert".to_string()))
    }

    async fn get_by_pair(&self, pair: UserPair) -> Result<Option<Relationship>, RelationError> {
        self.fetch_pair(pair).await
    }

    async fn update_status(
        &self,
        pair: UserPair,
        actor: UserId,
        status: RelationshipStatus,
    ) -> Result<Relationship, RelationError> {
        // rows_affected counts changed rows, not matched ones, so a write
        // that repeats the stored values looks like a miss. Re-select to
        // distinguish an absent row from an unchanged one.
        sqlx::query(
            r#"
UPDATE relationship
SET status = ?, action_user_id = ?
WHERE user_min = ? AND user_max = ?
"#,
        )
        .bind(status)
        .bind(actor)
        .bind(pair.min())
        .bind(pair.max())
        .execute(&self.pool)
        .await
        .map_err(|e| RelationError::Store(format!("update relationship: {e}")))?;

        self.fetch_pair(pair)
            .await?
            .ok_or(RelationError::RelationshipNotFound)
    }

    async fn remove(&self, pair: UserPair) -> Result<(), RelationError> {
        let result = sqlx::query(r#"DELETE FROM relationship WHERE user_min = ? AND user_max = ?"#)
            .bind(pair.min())
            .bind(pair.max())
            .execute(&self.pool)
            .await
            .map_err(|e| RelationError::Store(format!("delete relationship: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(RelationError::RelationshipNotFound);
        }

        Ok(())
    }

    async fn list_friends(&self, user_id: UserId) -> Result<Vec<FriendSummary>, RelationError> {
        sqlx::query_as::<_, FriendSummary>(
            r#"
SELECT
    IF(? = r.user_min, r.user_max, r.user_min) AS user_id,
    u.username                                 AS username,
    r.updated_at                               AS since
FROM relationship r
JOIN user u
  ON u.user_id = IF(? = r.user_min, r.user_max, r.user_min)
WHERE r.status = ?
  AND (? = r.user_min OR ? = r.user_max)
ORDER BY r.updated_at DESC,
         u.username ASC
"#,
        )
        .bind(user_id)
        .bind(user_id)
        .bind(RelationshipStatus::Friend)
        .bind(user_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RelationError::Store(format!("list friends: {e}")))
    }

    async fn list_pending(
        &self,
        user_id: UserId,
    ) -> Result<Vec<PendingRequestSummary>, RelationError> {
        // Mapped from SQL
        #[derive(sqlx::FromRow)]
        struct Row {
            other_user: UserId,
            username: String,
            action_user_id: UserId,
            requested_at: DateTime<Utc>,
        }

        let rows = sqlx::query_as::<_, Row>(
            r#"
SELECT
    IF(? = r.user_min, r.user_max, r.user_min) AS other_user,
    u.username                                 AS username,
    r.action_user_id                           AS action_user_id,
    r.created_at                               AS requested_at
FROM relationship r
JOIN user u
  ON u.user_id = IF(? = r.user_min, r.user_max, r.user_min)
WHERE r.status = ?
  AND (? = r.user_min OR ? = r.user_max)
ORDER BY r.created_at DESC,
         u.username ASC
"#,
        )
        .bind(user_id)
        .bind(user_id)
        .bind(RelationshipStatus::Pending)
        .bind(user_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RelationError::Store(format!("list pending: {e}")))?;

        let out = rows
            .into_iter()
            .map(|r| PendingRequestSummary {
                user_id: r.other_user,
                username: r.username,
                direction: if r.action_user_id == user_id {
                    RequestDirection::Outgoing
                } else {
                    RequestDirection::Incoming
                },
                requested_at: r.requested_at,
            })
            .collect();

        Ok(out)
    }
}

use crate::domain_model::UserId;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Persisted relationship state codes. The discriminants are the wire and
/// storage values; never reorder them.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[repr(i8)]
pub enum RelationshipStatus {
    Pending = 0,
    Friend = 1,
    Rejected = 2,
    Blocked = 3,
}

/// Verbs a participant can apply to an existing relationship row.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum FriendAction {
    Accept,
    Reject,
    Cancel,
    Block,
}

impl FriendAction {
    /// The enumerated transition table. `Cancel` has no target status:
    /// it removes the row instead.
    pub fn target_status(self) -> Option<RelationshipStatus> {
        match self {
            FriendAction::Accept => Some(RelationshipStatus::Friend),
            FriendAction::Reject => Some(RelationshipStatus::Rejected),
            FriendAction::Block => Some(RelationshipStatus::Blocked),
            FriendAction::Cancel => None,
        }
    }
}

impl FromStr for FriendAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "accept" => Ok(FriendAction::Accept),
            "reject" => Ok(FriendAction::Reject),
            "cancel" => Ok(FriendAction::Cancel),
            "block" => Ok(FriendAction::Block),
            other => Err(format!("unknown action: {other}")),
        }
    }
}

impl fmt::Display for FriendAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            FriendAction::Accept => "accept",
            FriendAction::Reject => "reject",
            FriendAction::Cancel => "cancel",
            FriendAction::Block => "block",
        };
        write!(f, "{verb}")
    }
}

/// The single persisted record of friendship state between two users.
/// `user_min < user_max` always holds; `action_user_id` is the participant
/// who caused the current status.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Relationship {
    pub user_min: UserId,
    pub user_max: UserId,
    pub action_user_id: UserId,
    pub status: RelationshipStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Relationship {
    pub fn involves(&self, user: UserId) -> bool {
        self.user_min == user || self.user_max == user
    }

    /// The participant on the other side of `user`, if `user` is a participant.
    pub fn other(&self, user: UserId) -> Option<UserId> {
        if user == self.user_min {
            Some(self.user_max)
        } else if user == self.user_max {
            Some(self.user_min)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct FriendSummary {
    pub user_id: UserId,
    pub username: String,
    pub since: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestDirection {
    Incoming,
    Outgoing,
}

#[derive(Debug, Clone, Serialize)]
pub struct PendingRequestSummary {
    pub user_id: UserId,
    pub username: String,
    pub direction: RequestDirection,
    pub requested_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_parses_case_insensitively() {
        assert_eq!("accept".parse::<FriendAction>().unwrap(), FriendAction::Accept);
        assert_eq!("Reject".parse::<FriendAction>().unwrap(), FriendAction::Reject);
        assert_eq!("CANCEL".parse::<FriendAction>().unwrap(), FriendAction::Cancel);
        assert_eq!("block".parse::<FriendAction>().unwrap(), FriendAction::Block);
        assert!("addfriend".parse::<FriendAction>().is_err());
        assert!("".parse::<FriendAction>().is_err());
    }

    #[test]
    fn transition_table_is_exhaustive() {
        assert_eq!(
            FriendAction::Accept.target_status(),
            Some(RelationshipStatus::Friend)
        );
        assert_eq!(
            FriendAction::Reject.target_status(),
            Some(RelationshipStatus::Rejected)
        );
        assert_eq!(
            FriendAction::Block.target_status(),
            Some(RelationshipStatus::Blocked)
        );
        assert_eq!(FriendAction::Cancel.target_status(), None);
    }

    #[test]
    fn relationship_resolves_the_other_side() {
        let rel = Relationship {
            user_min: UserId(1),
            user_max: UserId(2),
            action_user_id: UserId(1),
            status: RelationshipStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(rel.involves(UserId(1)));
        assert!(rel.involves(UserId(2)));
        assert!(!rel.involves(UserId(3)));
        assert_eq!(rel.other(UserId(1)), Some(UserId(2)));
        assert_eq!(rel.other(UserId(2)), Some(UserId(1)));
        assert_eq!(rel.other(UserId(3)), None);
    }
}

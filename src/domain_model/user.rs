use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(UserId)
    }
}

/// Unordered user pair in canonical order, smaller id first.
/// The relationship table is keyed on (min, max), so a lookup through
/// `UserPair` is direction-agnostic by construction.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct UserPair(UserId, UserId);

impl UserPair {
    pub fn new(a: UserId, b: UserId) -> Self {
        if a < b { Self(a, b) } else { Self(b, a) }
    }

    pub fn min(&self) -> UserId {
        self.0
    }

    pub fn max(&self) -> UserId {
        self.1
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub profile_picture_url: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

/// Partial profile update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub profile_picture_url: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_pair_orders_either_way() {
        let a = UserId(7);
        let b = UserId(3);

        let p1 = UserPair::new(a, b);
        let p2 = UserPair::new(b, a);

        assert_eq!(p1.min(), UserId(3));
        assert_eq!(p1.max(), UserId(7));
        assert_eq!(p2.min(), p1.min());
        assert_eq!(p2.max(), p1.max());
    }

    #[test]
    fn user_id_parses_from_path_segment() {
        assert_eq!("42".parse::<UserId>().unwrap(), UserId(42));
        assert!("fortytwo".parse::<UserId>().is_err());
    }
}

use crate::application_port::*;
use crate::domain_model::*;

/// Server-side record of live refresh tokens, keyed by jti.
#[async_trait::async_trait]
pub trait AuthSessionStore: Send + Sync {
    /// Remember a refresh jti for a user until `ttl_secs` elapses.
    async fn save_refresh_jti(
        &self,
        user_id: UserId,
        jti: &str,
        ttl_secs: u64,
    ) -> Result<(), AuthError>;

    /// Look the jti up; with `consume` set, delete it in the same step so a
    /// replayed token loses the race.
    async fn check_refresh_jti(
        &self,
        user_id: UserId,
        jti: &str,
        consume: bool,
    ) -> Result<Option<UserId>, AuthError>;
}

use crate::application_port::AuthError;
use crate::domain_model::{Profile, ProfileUpdate, UserId};

#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    async fn get_profile(&self, username: &str) -> Result<Profile, AuthError>;
    async fn update_profile(&self, actor: UserId, changes: ProfileUpdate)
    -> Result<(), AuthError>;
}

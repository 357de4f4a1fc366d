use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use std::sync::Arc;

pub struct RealUserService {
    user_repo: Arc<dyn UserRepo>,
    auth_repo: Arc<dyn AuthRepo>,
}

impl RealUserService {
    pub fn new(user_repo: Arc<dyn UserRepo>, auth_repo: Arc<dyn AuthRepo>) -> RealUserService {
        RealUserService {
            user_repo,
            auth_repo,
        }
    }
}

#[async_trait::async_trait]
impl UserService for RealUserService {
    async fn get_profile(&self, username: &str) -> Result<Profile, AuthError> {
        let user = self
            .user_repo
            .get_by_username(username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        // The email lives with the credentials, not the profile row.
        let cred = self
            .auth_repo
            .get_by_user_id(user.user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(Profile {
            user_id: user.user_id,
            username: user.username,
            email: cred.email,
            first_name: user.first_name,
            last_name: user.last_name,
            city: user.city,
            state: user.state,
            country: user.country,
            profile_picture_url: user.profile_picture_url,
            birth_date: user.birth_date,
        })
    }

    async fn update_profile(&self, actor: UserId, changes: ProfileUpdate) -> Result<(), AuthError> {
        self.user_repo.update_profile(actor, &changes).await?;
        tracing::debug!(user_id = %actor, "profile updated");
        Ok(())
    }
}

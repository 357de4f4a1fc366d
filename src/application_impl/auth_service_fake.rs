use crate::application_port::*;
use crate::domain_model::UserId;
use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};

#[derive(Debug)]
pub struct FakeAuthService;

impl FakeAuthService {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FakeAuthService {
    fn default() -> Self {
        Self::new()
    }
}

// Minimal fake implementation for basic use only.
// Extend to simulate more error cases and configurable responses when needed.
#[async_trait::async_trait]
impl AuthService for FakeAuthService {
    async fn signup(&self, request: SignupInput) -> Result<UserId, AuthError> {
        Ok(get_fake_id(&request.email))
    }

    async fn login(&self, request: LoginInput) -> Result<LoginResult, AuthError> {
        Ok(LoginResult {
            user_id: get_fake_id(&request.email),
            tokens: get_fake_token(&request.email),
        })
    }

    async fn verify_token(&self, token: &str) -> Result<UserId, AuthError> {
        if let Some(email) = token.strip_prefix("fake-access-token:") {
            Ok(get_fake_id(email))
        } else {
            Err(AuthError::TokenInvalid)
        }
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<AuthTokens, AuthError> {
        if let Some(email) = refresh_token.strip_prefix("fake-refresh-token:") {
            Ok(get_fake_token(email))
        } else {
            Err(AuthError::TokenInvalid)
        }
    }

    async fn forgot_password(&self, _email: &str) -> Result<(), AuthError> {
        Ok(())
    }

    async fn reset_password(&self, _token: &str, _new_password: &str) -> Result<(), AuthError> {
        Ok(())
    }
}

fn get_fake_id(email: &str) -> UserId {
    // Stable id per email, folded down to a non-negative i64.
    let digest = Sha256::digest(email.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    UserId(i64::from_be_bytes(bytes) & i64::MAX)
}

fn get_fake_token(email: &str) -> AuthTokens {
    let now = Utc::now();
    AuthTokens {
        access_token: AccessToken(format!("fake-access-token:{}", email)),
        access_token_expires_at: now + Duration::days(1), // 1 day
        refresh_token: RefreshToken(format!("fake-refresh-token:{}", email)),
        refresh_token_expires_at: now + Duration::days(7), // 7 days
    }
}

use ensemble::application_impl::{Argon2PasswordHasher, JwtConfig, JwtHs256Codec, RealAuthService};
use ensemble::application_port::{AuthError, AuthService, LoginInput, SignupInput};
use ensemble::domain_model::UserId;
use ensemble::domain_port::{MailError, MailMessage, MailSender};
use ensemble::infra_memory::{
    MemoryAuthRepo, MemoryAuthSessionStore, MemoryDb, MemoryTxManager, MemoryUserRepo,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Collects outbound mail so tests can read reset links back out.
#[derive(Default)]
struct CapturingMailSender {
    outbox: Mutex<Vec<MailMessage>>,
}

impl CapturingMailSender {
    fn last(&self) -> MailMessage {
        self.outbox
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("a mail was sent")
    }

    fn count(&self) -> usize {
        self.outbox.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl MailSender for CapturingMailSender {
    async fn send(&self, message: MailMessage) -> Result<(), MailError> {
        self.outbox.lock().unwrap().push(message);
        Ok(())
    }
}

struct AuthWorld {
    auth: RealAuthService,
    mail: Arc<CapturingMailSender>,
}

fn world() -> AuthWorld {
    let db = Arc::new(MemoryDb::new());
    let mail = Arc::new(CapturingMailSender::default());
    let auth = RealAuthService::new(
        Arc::new(MemoryAuthRepo::new(db.clone())),
        Arc::new(MemoryUserRepo::new(db.clone())),
        Arc::new(Argon2PasswordHasher),
        Arc::new(JwtHs256Codec::new(JwtConfig {
            issuer: "ensemble.auth".to_string(),
            audience: "ensemble-client".to_string(),
            access_ttl: Duration::from_secs(3600),
            refresh_ttl: Duration::from_secs(7200),
            reset_ttl: Duration::from_secs(3600),
            signing_key: b"test-signing-key".to_vec(),
        })),
        Arc::new(MemoryAuthSessionStore::new()),
        Arc::new(MemoryTxManager),
        mail.clone(),
        "https://app.test",
    );
    AuthWorld { auth, mail }
}

async fn signup(world: &AuthWorld, username: &str, email: &str, password: &str) -> UserId {
    world
        .auth
        .signup(SignupInput {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        })
        .await
        .unwrap()
}

fn reset_token_in(body: &str) -> String {
    let start = body
        .find("/reset-password/")
        .expect("body carries a reset link")
        + "/reset-password/".len();
    body[start..]
        .split_whitespace()
        .next()
        .expect("token follows the link prefix")
        .to_string()
}

#[tokio::test]
async fn signup_login_and_verify_round_trip() {
    let w = world();
    let user_id = signup(&w, "morgan_lee", "morgan@example.com", "sekrit1").await;

    let login = w
        .auth
        .login(LoginInput {
            email: "morgan@example.com".to_string(),
            password: "sekrit1".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(login.user_id, user_id);

    let verified = w.auth.verify_token(&login.tokens.access_token.0).await.unwrap();
    assert_eq!(verified, user_id);
}

#[tokio::test]
async fn signup_rejects_taken_username_and_taken_email() {
    let w = world();
    signup(&w, "morgan_lee", "morgan@example.com", "sekrit1").await;

    let taken_username = w
        .auth
        .signup(SignupInput {
            username: "morgan_lee".to_string(),
            email: "other@example.com".to_string(),
            password: "sekrit1".to_string(),
        })
        .await;
    assert!(matches!(taken_username, Err(AuthError::UsernameTaken)));

    let taken_email = w
        .auth
        .signup(SignupInput {
            username: "morgan_two".to_string(),
            email: "morgan@example.com".to_string(),
            password: "sekrit1".to_string(),
        })
        .await;
    assert!(matches!(taken_email, Err(AuthError::EmailTaken)));
}

#[tokio::test]
async fn signup_validates_username_password_and_email() {
    let w = world();

    let short_username = w
        .auth
        .signup(SignupInput {
            username: "mo".to_string(),
            email: "mo@example.com".to_string(),
            password: "sekrit1".to_string(),
        })
        .await;
    assert!(matches!(short_username, Err(AuthError::Validation(_))));

    let short_password = w
        .auth
        .signup(SignupInput {
            username: "morgan_lee".to_string(),
            email: "morgan@example.com".to_string(),
            password: "pw".to_string(),
        })
        .await;
    assert!(matches!(short_password, Err(AuthError::Validation(_))));

    let bad_email = w
        .auth
        .signup(SignupInput {
            username: "morgan_lee".to_string(),
            email: "not-an-address".to_string(),
            password: "sekrit1".to_string(),
        })
        .await;
    assert!(matches!(bad_email, Err(AuthError::Validation(_))));
}

#[tokio::test]
async fn login_rejects_wrong_password_and_unknown_email() {
    let w = world();
    signup(&w, "morgan_lee", "morgan@example.com", "sekrit1").await;

    let wrong_password = w
        .auth
        .login(LoginInput {
            email: "morgan@example.com".to_string(),
            password: "wrongpw".to_string(),
        })
        .await;
    assert!(matches!(wrong_password, Err(AuthError::InvalidCredentials)));

    let unknown_email = w
        .auth
        .login(LoginInput {
            email: "nobody@example.com".to_string(),
            password: "sekrit1".to_string(),
        })
        .await;
    assert!(matches!(unknown_email, Err(AuthError::InvalidCredentials)));
}

#[tokio::test]
async fn refresh_rotates_and_consumes_the_old_token() {
    let w = world();
    let user_id = signup(&w, "morgan_lee", "morgan@example.com", "sekrit1").await;

    let login = w
        .auth
        .login(LoginInput {
            email: "morgan@example.com".to_string(),
            password: "sekrit1".to_string(),
        })
        .await
        .unwrap();

    let old_refresh = login.tokens.refresh_token.0.clone();
    let rotated = w.auth.refresh_token(&old_refresh).await.unwrap();

    let verified = w.auth.verify_token(&rotated.access_token.0).await.unwrap();
    assert_eq!(verified, user_id);

    // The consumed token is dead; the fresh one keeps the chain alive.
    assert!(matches!(
        w.auth.refresh_token(&old_refresh).await,
        Err(AuthError::TokenInvalid)
    ));
    assert!(w.auth.refresh_token(&rotated.refresh_token.0).await.is_ok());
}

#[tokio::test]
async fn forgot_password_for_unknown_email_is_not_found() {
    let w = world();

    assert!(matches!(
        w.auth.forgot_password("nobody@example.com").await,
        Err(AuthError::UserNotFound)
    ));
    assert_eq!(w.mail.count(), 0);
}

#[tokio::test]
async fn password_reset_flow_changes_the_password() {
    let w = world();
    signup(&w, "morgan_lee", "morgan@example.com", "sekrit1").await;

    w.auth.forgot_password("morgan@example.com").await.unwrap();

    let reset_mail = w.mail.last();
    assert_eq!(reset_mail.to, "morgan@example.com");
    assert_eq!(reset_mail.subject, "Password Reset");
    assert!(reset_mail.body.contains("1 hour"));

    let token = reset_token_in(&reset_mail.body);
    w.auth.reset_password(&token, "brandnew9").await.unwrap();

    let confirmation = w.mail.last();
    assert_eq!(confirmation.subject, "Password Changed");

    let old_password = w
        .auth
        .login(LoginInput {
            email: "morgan@example.com".to_string(),
            password: "sekrit1".to_string(),
        })
        .await;
    assert!(matches!(old_password, Err(AuthError::InvalidCredentials)));

    let new_password = w
        .auth
        .login(LoginInput {
            email: "morgan@example.com".to_string(),
            password: "brandnew9".to_string(),
        })
        .await;
    assert!(new_password.is_ok());
}

#[tokio::test]
async fn reset_token_is_single_use() {
    let w = world();
    signup(&w, "morgan_lee", "morgan@example.com", "sekrit1").await;

    w.auth.forgot_password("morgan@example.com").await.unwrap();
    let token = reset_token_in(&w.mail.last().body);

    w.auth.reset_password(&token, "brandnew9").await.unwrap();
    assert!(matches!(
        w.auth.reset_password(&token, "thirdpw99").await,
        Err(AuthError::TokenInvalid)
    ));
}

#[tokio::test]
async fn a_newer_reset_link_replaces_the_old_one() {
    let w = world();
    signup(&w, "morgan_lee", "morgan@example.com", "sekrit1").await;

    w.auth.forgot_password("morgan@example.com").await.unwrap();
    let first_token = reset_token_in(&w.mail.last().body);

    w.auth.forgot_password("morgan@example.com").await.unwrap();
    let second_token = reset_token_in(&w.mail.last().body);

    assert!(matches!(
        w.auth.reset_password(&first_token, "brandnew9").await,
        Err(AuthError::TokenInvalid)
    ));
    assert!(w.auth.reset_password(&second_token, "brandnew9").await.is_ok());
}

#[tokio::test]
async fn reset_rejects_foreign_and_malformed_tokens() {
    let w = world();
    signup(&w, "morgan_lee", "morgan@example.com", "sekrit1").await;

    assert!(matches!(
        w.auth.reset_password("not-a-jwt", "brandnew9").await,
        Err(AuthError::TokenInvalid)
    ));

    // An access token is signed with the same key but is not a reset token.
    let login = w
        .auth
        .login(LoginInput {
            email: "morgan@example.com".to_string(),
            password: "sekrit1".to_string(),
        })
        .await
        .unwrap();
    assert!(matches!(
        w.auth
            .reset_password(&login.tokens.access_token.0, "brandnew9")
            .await,
        Err(AuthError::TokenInvalid)
    ));

    // Too-short replacement passwords never reach the store.
    w.auth.forgot_password("morgan@example.com").await.unwrap();
    let token = reset_token_in(&w.mail.last().body);
    assert!(matches!(
        w.auth.reset_password(&token, "pw").await,
        Err(AuthError::Validation(_))
    ));
}

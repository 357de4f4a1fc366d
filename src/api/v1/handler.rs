use super::error::*;
use crate::application_port::*;
use crate::domain_model::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::{self, reject};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(code: ApiErrorCode, message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
        }
    }
}

// Path params arrive as raw strings so a malformed id answers 400 from the
// matched route rather than falling through to the 404 catch-all.
fn parse_path_id<T: std::str::FromStr>(raw: &str) -> Result<T, warp::Rejection> {
    raw.parse::<T>()
        .map_err(|_| reject::custom(ApiErrorCode::InvalidId))
}

// ---- auth ----

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub user_id: UserId,
}

pub async fn signup(
    body: SignupRequest,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let signup_input = SignupInput {
        username: body.username,
        email: body.email,
        password: body.password,
    };
    let user_id = auth_service
        .signup(signup_input)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(SignupResponse {
        user_id,
    })))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: UserId,
    pub auth_tokens: AuthTokens,
}

pub async fn login(
    body: LoginRequest,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let login_input = LoginInput {
        email: body.email,
        password: body.password,
    };
    let login_result = auth_service
        .login(login_input)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    let login_response = LoginResponse {
        user_id: login_result.user_id,
        auth_tokens: login_result.tokens,
    };

    Ok(warp::reply::json(&ApiResponse::ok(login_response)))
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

pub async fn refresh(
    body: RefreshRequest,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let tokens = auth_service
        .refresh_token(&body.refresh_token)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(tokens)))
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct ForgotPasswordResponse;

pub async fn forgot_password(
    body: ForgotPasswordRequest,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    auth_service
        .forgot_password(&body.email)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(ForgotPasswordResponse)))
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
    pub confirm: String,
}

#[derive(Debug, Serialize)]
pub struct ResetPasswordResponse;

pub async fn reset_password(
    token: String,
    body: ResetPasswordRequest,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    if body.password != body.confirm {
        return Err(reject::custom(ApiErrorCode::PasswordMismatch));
    }

    auth_service
        .reset_password(&token, &body.password)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(ResetPasswordResponse)))
}

// ---- users ----

pub async fn get_profile(
    username: String,
    _user_id: UserId,
    user_service: Arc<dyn UserService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let profile = user_service
        .get_profile(&username)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(profile)))
}

#[derive(Debug, Serialize)]
pub struct UpdateProfileResponse;

pub async fn update_profile(
    body: ProfileUpdate,
    user_id: UserId,
    user_service: Arc<dyn UserService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    user_service
        .update_profile(user_id, body)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(UpdateProfileResponse)))
}

// ---- posts ----

pub async fn feed(
    _user_id: UserId,
    post_service: Arc<dyn PostService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let posts = post_service
        .feed()
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(posts)))
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub caption: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatePostResponse {
    pub post_id: PostId,
}

pub async fn create_post(
    body: CreatePostRequest,
    user_id: UserId,
    post_service: Arc<dyn PostService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let post_id = post_service
        .create_post(user_id, &body.caption, body.image_url.as_deref())
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(CreatePostResponse {
        post_id,
    })))
}

#[derive(Debug, Serialize)]
pub struct DeletePostResponse;

pub async fn delete_post(
    raw_post_id: String,
    user_id: UserId,
    post_service: Arc<dyn PostService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let post_id: PostId = parse_path_id(&raw_post_id)?;

    post_service
        .delete_post(user_id, post_id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(DeletePostResponse)))
}

// ---- friend requests ----

pub async fn send_request(
    raw_friend_id: String,
    user_id: UserId,
    relationship_service: Arc<dyn RelationshipService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let other: UserId = parse_path_id(&raw_friend_id)?;
    if other == user_id {
        return Err(reject::custom(ApiErrorCode::SelfRequest));
    }

    let relationship = relationship_service
        .send_request(user_id, other)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(relationship)))
}

pub async fn respond(
    action: String,
    raw_friend_id: String,
    user_id: UserId,
    relationship_service: Arc<dyn RelationshipService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let other: UserId = parse_path_id(&raw_friend_id)?;

    let outcome = relationship_service
        .respond(user_id, other, &action)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(outcome)))
}

pub async fn list_friends(
    user_id: UserId,
    relationship_service: Arc<dyn RelationshipService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let friends = relationship_service
        .list_friends(user_id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(friends)))
}

pub async fn list_pending(
    user_id: UserId,
    relationship_service: Arc<dyn RelationshipService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let pending = relationship_service
        .list_pending(user_id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(pending)))
}

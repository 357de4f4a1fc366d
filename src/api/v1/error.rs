use crate::api::v1::handler::ApiResponse;
use crate::application_port::*;
use serde::Serialize;
use std::convert::Infallible;
use thiserror::Error;
use tracing::warn;
use warp::http::StatusCode;
use warp::{Rejection, reject};

pub async fn recover_error(err: Rejection) -> Result<impl warp::Reply, Infallible> {
    let (status, code, message) = if let Some(code) = err.find::<ApiErrorCode>() {
        (code.status(), code.clone(), code.to_string())
    } else if err.is_not_found() {
        (
            StatusCode::NOT_FOUND,
            ApiErrorCode::RouteNotFound,
            "No such route exists".to_string(),
        )
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (
            StatusCode::BAD_REQUEST,
            ApiErrorCode::InvalidBody,
            e.to_string(),
        )
    } else if let Some(e) = err.find::<warp::reject::MissingHeader>() {
        if e.name().eq_ignore_ascii_case("authorization") {
            (
                StatusCode::UNAUTHORIZED,
                ApiErrorCode::InvalidToken,
                "missing authorization header".to_string(),
            )
        } else {
            (
                StatusCode::BAD_REQUEST,
                ApiErrorCode::InvalidBody,
                e.to_string(),
            )
        }
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            ApiErrorCode::MethodNotAllowed,
            "method not allowed".to_string(),
        )
    } else {
        warn!("unhandled rejection: {err:?}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiErrorCode::InternalError,
            "Internal error".to_string(),
        )
    };

    let json = warp::reply::json(&ApiResponse::<()>::err(code, message));
    Ok(warp::reply::with_status(json, status))
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Error, Serialize)]
pub enum ApiErrorCode {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Email has already been used")]
    EmailTaken,
    #[error("Username already taken")]
    UsernameTaken,
    #[error("Token is not valid")]
    InvalidToken,
    #[error("User not found")]
    UserNotFound,
    #[error("No relationship exists for this pair")]
    RelationshipNotFound,
    #[error("A relationship already exists for this pair")]
    DuplicateRelationship,
    #[error("Unknown relationship action")]
    UnknownAction,
    #[error("Not permitted")]
    NotPermitted,
    #[error("Post not found")]
    PostNotFound,
    #[error("Only the author may delete a post")]
    NotPostOwner,
    #[error("Invalid id in path")]
    InvalidId,
    #[error("Cannot send a friend request to yourself")]
    SelfRequest,
    #[error("Invalid request body")]
    InvalidBody,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Invalid input")]
    ValidationFailed,
    #[error("No such route exists")]
    RouteNotFound,
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Internal error")]
    InternalError,
}

impl ApiErrorCode {
    /// Every code owns its HTTP status, so handlers cannot drift apart on
    /// what a duplicate pair or an unknown user answers with.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiErrorCode::InvalidCredentials | ApiErrorCode::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            ApiErrorCode::NotPermitted | ApiErrorCode::NotPostOwner => StatusCode::FORBIDDEN,
            ApiErrorCode::UserNotFound
            | ApiErrorCode::RelationshipNotFound
            | ApiErrorCode::PostNotFound
            | ApiErrorCode::RouteNotFound => StatusCode::NOT_FOUND,
            ApiErrorCode::EmailTaken
            | ApiErrorCode::UsernameTaken
            | ApiErrorCode::DuplicateRelationship => StatusCode::CONFLICT,
            ApiErrorCode::UnknownAction
            | ApiErrorCode::InvalidId
            | ApiErrorCode::SelfRequest
            | ApiErrorCode::InvalidBody => StatusCode::BAD_REQUEST,
            ApiErrorCode::PasswordMismatch | ApiErrorCode::ValidationFailed => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn internal<E: std::fmt::Display>(error: E) -> ApiErrorCode {
        warn!("Internal error: {}", error);
        ApiErrorCode::InternalError
    }
}

impl reject::Reject for ApiErrorCode {}

impl From<AuthError> for ApiErrorCode {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::InvalidCredentials => ApiErrorCode::InvalidCredentials,
            AuthError::EmailTaken => ApiErrorCode::EmailTaken,
            AuthError::UsernameTaken => ApiErrorCode::UsernameTaken,
            AuthError::UserNotFound => ApiErrorCode::UserNotFound,
            AuthError::TokenInvalid | AuthError::TokenExpired => ApiErrorCode::InvalidToken,
            AuthError::Validation(e) => {
                warn!("validation failed: {e}");
                ApiErrorCode::ValidationFailed
            }
            AuthError::Store(e) => ApiErrorCode::internal(e),
            AuthError::InternalError(e) => ApiErrorCode::internal(e),
        }
    }
}

impl From<RelationError> for ApiErrorCode {
    fn from(error: RelationError) -> Self {
        match error {
            RelationError::UnknownUser => ApiErrorCode::UserNotFound,
            RelationError::RelationshipNotFound => ApiErrorCode::RelationshipNotFound,
            RelationError::DuplicateRelationship => ApiErrorCode::DuplicateRelationship,
            RelationError::InvalidAction(e) => {
                warn!("unknown relationship action: {e}");
                ApiErrorCode::UnknownAction
            }
            RelationError::Unauthorized => ApiErrorCode::NotPermitted,
            RelationError::Store(e) => ApiErrorCode::internal(e),
        }
    }
}

impl From<PostError> for ApiErrorCode {
    fn from(error: PostError) -> Self {
        match error {
            PostError::PostNotFound => ApiErrorCode::PostNotFound,
            PostError::NotOwner => ApiErrorCode::NotPostOwner,
            PostError::Store(e) => ApiErrorCode::internal(e),
        }
    }
}

use super::error::*;
use super::handler;
use crate::application_port::AuthService;
use crate::domain_model::UserId;
use crate::server::Server;
use std::convert::Infallible;
use std::sync::Arc;
use warp::{Filter, http, reject};

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    // ---- users ----

    let signup = warp::post()
        .and(warp::path("users"))
        .and(warp::path("signup"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with(server.auth_service.clone()))
        .and_then(handler::signup);

    let login = warp::post()
        .and(warp::path("users"))
        .and(warp::path("login"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with(server.auth_service.clone()))
        .and_then(handler::login);

    let refresh = warp::post()
        .and(warp::path("users"))
        .and(warp::path("refresh"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with(server.auth_service.clone()))
        .and_then(handler::refresh);

    let forgot_password = warp::post()
        .and(warp::path("users"))
        .and(warp::path("forgot-password"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with(server.auth_service.clone()))
        .and_then(handler::forgot_password);

    let reset_password = warp::post()
        .and(warp::path("users"))
        .and(warp::path("reset"))
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with(server.auth_service.clone()))
        .and_then(handler::reset_password);

    let update_profile = warp::put()
        .and(warp::path("users"))
        .and(warp::path("profile"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with_verification(server.auth_service.clone()))
        .and(with(server.user_service.clone()))
        .and_then(handler::update_profile);

    // Keep this after the fixed-segment user routes: it matches any single
    // trailing segment as a username.
    let get_profile = warp::get()
        .and(warp::path("users"))
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(with_verification(server.auth_service.clone()))
        .and(with(server.user_service.clone()))
        .and_then(handler::get_profile);

    // ---- posts ----

    let feed = warp::get()
        .and(warp::path("posts"))
        .and(warp::path::end())
        .and(with_verification(server.auth_service.clone()))
        .and(with(server.post_service.clone()))
        .and_then(handler::feed);

    let create_post = warp::post()
        .and(warp::path("posts"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with_verification(server.auth_service.clone()))
        .and(with(server.post_service.clone()))
        .and_then(handler::create_post);

    let delete_post = warp::delete()
        .and(warp::path("posts"))
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(with_verification(server.auth_service.clone()))
        .and(with(server.post_service.clone()))
        .and_then(handler::delete_post);

    // ---- friend requests ----

    let send_request = warp::post()
        .and(warp::path("requests"))
        .and(warp::path("send-request"))
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(with_verification(server.auth_service.clone()))
        .and(with(server.relationship_service.clone()))
        .and_then(handler::send_request);

    let list_friends = warp::get()
        .and(warp::path("requests"))
        .and(warp::path("list"))
        .and(warp::path::end())
        .and(with_verification(server.auth_service.clone()))
        .and(with(server.relationship_service.clone()))
        .and_then(handler::list_friends);

    let list_pending = warp::get()
        .and(warp::path("requests"))
        .and(warp::path("pending"))
        .and(warp::path::end())
        .and(with_verification(server.auth_service.clone()))
        .and(with(server.relationship_service.clone()))
        .and_then(handler::list_pending);

    // Matches any other verb segment; must come after send-request so that
    // route keeps its own match.
    let respond = warp::post()
        .and(warp::path("requests"))
        .and(warp::path::param::<String>())
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(with_verification(server.auth_service.clone()))
        .and(with(server.relationship_service.clone()))
        .and_then(handler::respond);

    signup
        .or(login)
        .or(refresh)
        .or(forgot_password)
        .or(reset_password)
        .or(update_profile)
        .or(get_profile)
        .or(feed)
        .or(create_post)
        .or(delete_post)
        .or(send_request)
        .or(list_friends)
        .or(list_pending)
        .or(respond)
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}

fn with_verification(
    auth_service: Arc<dyn AuthService>,
) -> impl Filter<Extract = (UserId,), Error = warp::Rejection> + Clone {
    warp::header::<String>(http::header::AUTHORIZATION.as_ref()).and_then(move |token: String| {
        let auth_service = auth_service.clone();
        async move {
            if let Some(token) = token.strip_prefix("Bearer ") {
                let user_id = auth_service
                    .verify_token(token)
                    .await
                    .map_err(ApiErrorCode::from)
                    .map_err(reject::custom)?;
                Ok(user_id)
            } else {
                Err(reject::custom(ApiErrorCode::InvalidToken))
            }
        }
    })
}

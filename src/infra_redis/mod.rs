mod auth_session_store_redis;
mod post_cache_redis;

pub use auth_session_store_redis::*;
pub use post_cache_redis::*;

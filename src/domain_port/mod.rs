// store

mod auth_session_store;
mod post_cache;

pub use auth_session_store::*;
pub use post_cache::*;

// repo

mod auth_repo;
mod post_repo;
mod relationship_repo;
mod user_repo;

mod repo_tx;

pub use auth_repo::*;
pub use post_repo::*;
pub use relationship_repo::*;
pub use user_repo::*;

pub use repo_tx::*;

// outbound

mod mail_sender;

pub use mail_sender::*;

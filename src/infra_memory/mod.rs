mod db;

pub use db::*;

mod auth_repo_memory;
mod post_repo_memory;
mod relationship_repo_memory;
mod user_repo_memory;

pub use auth_repo_memory::*;
pub use post_repo_memory::*;
pub use relationship_repo_memory::*;
pub use user_repo_memory::*;

mod auth_session_store_memory;
mod post_cache_memory;

pub use auth_session_store_memory::*;
pub use post_cache_memory::*;

mod mail_sender_log;
mod repo_tx_memory;

pub use mail_sender_log::*;
pub use repo_tx_memory::*;

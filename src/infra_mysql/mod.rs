mod auth_repo_mysql;
mod post_repo_mysql;
mod relationship_repo_mysql;
mod user_repo_mysql;

pub use auth_repo_mysql::*;
pub use post_repo_mysql::*;
pub use relationship_repo_mysql::*;
pub use user_repo_mysql::*;

mod repo_tx_mysql;

pub use repo_tx_mysql::*;

mod util;

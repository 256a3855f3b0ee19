pub mod client;
pub mod migrate;
pub mod posts;
pub mod serve;
pub mod users;

pub use migrate::{run_migrate, MigrateArgs};
pub use posts::{run_posts, PostsArgs};
pub use serve::{run_serve, ServeArgs};
pub use users::{run_users, UsersArgs};

//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod post;
pub mod resource;
pub mod user;
pub mod validation;

pub use post::{NewPost, PostChanges, PostTitle};
pub use resource::Resource;
pub use user::{Email, NewUser, UserChanges};
pub use validation::ValidationError;

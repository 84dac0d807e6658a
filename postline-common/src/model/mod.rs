pub mod index;
pub mod post;
pub mod user;

pub use index::{InvalidPostIndexError, PostIndex};
pub use post::{Post, PostPatch};
pub use user::{User, UserPatch};

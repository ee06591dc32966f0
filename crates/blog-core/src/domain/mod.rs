//! Domain entities - the core business objects.

mod comment;
mod post;
mod user;

pub use comment::{Comment, CommentId, NewComment};
pub use post::{NewPost, Post, PostId};
pub use user::{NewUser, User, UserId};

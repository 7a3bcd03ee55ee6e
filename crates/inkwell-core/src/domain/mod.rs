//! Domain entities - the nodes and edges of the content graph.

mod comment;
mod like;
mod post;
mod user;

pub use comment::{Comment, CommentId, NewComment};
pub use like::{Like, LikeKind, LikeTarget};
pub use post::{NewPost, PhotoUpdate, Post, PostId};
pub use user::{ADMIN_ROLE, BOOTSTRAP_USER_NAME, User, UserId};

//! SeaORM entities for the blog tables.

pub mod comment;
pub mod comment_like;
pub mod post;
pub mod post_like;
pub mod user;

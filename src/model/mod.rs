//! Feed data: canonical posts, partial updates, and viewer-relative views.

mod patch;
mod post;
mod view;

pub use patch::{FieldValue, PostField, PostPatch};
pub use post::{
    Author, Comment, CommentId, CommentReply, Favorite, Like, Media, MediaType, Post, PostId,
    PostType, UserId, Visibility,
};
pub use view::{format_compact_number, Engagement, PostView};

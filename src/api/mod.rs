//! The server mutation interface.
//!
//! [`FeedApi`] is the seam between client state and the application server.
//! Each method wraps exactly one authoritative request; the feed store only
//! needs to know whether it resolved or rejected.

mod error;
mod http;
mod types;

use std::future::Future;

use crate::model::{Comment, Post, PostId};

pub use error::ApiError;
pub use http::HttpFeedApi;
pub use types::{CreateCommentInput, CreatePostInput, FavoriteToggled, LikeToggled, MediaUpload};

pub trait FeedApi: Send + Sync {
    /// Newest posts first, with author, media, likes and comments.
    fn latest_feed(&self) -> impl Future<Output = Result<Vec<Post>, ApiError>> + Send;

    fn post_by_id(&self, id: &PostId) -> impl Future<Output = Result<Post, ApiError>> + Send;

    /// Flip the caller's like on a post; reports the resulting state.
    fn toggle_like(&self, id: &PostId)
        -> impl Future<Output = Result<LikeToggled, ApiError>> + Send;

    /// Flip the caller's favorite on a post; reports the resulting state.
    fn toggle_favorite(
        &self,
        id: &PostId,
    ) -> impl Future<Output = Result<FavoriteToggled, ApiError>> + Send;

    fn create_comment(
        &self,
        input: &CreateCommentInput,
    ) -> impl Future<Output = Result<Comment, ApiError>> + Send;

    /// Comments of a post, newest first, with replies.
    fn comments_for_post(
        &self,
        id: &PostId,
    ) -> impl Future<Output = Result<Vec<Comment>, ApiError>> + Send;

    fn create_post(
        &self,
        input: &CreatePostInput,
    ) -> impl Future<Output = Result<Post, ApiError>> + Send;

    fn delete_post(&self, id: &PostId) -> impl Future<Output = Result<(), ApiError>> + Send;
}

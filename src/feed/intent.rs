use crate::model::{Post, PostId, PostPatch, UserId};
use crate::mvi::Intent;

#[derive(Debug, Clone)]
pub enum FeedIntent {
    /// Replace the whole list, typically with a freshly fetched feed.
    ReplaceAll(Vec<Post>),
    /// Prepend a post. An entry with the same id is dropped first.
    Insert(Post),
    /// Drop the post with this id, if present.
    Remove(PostId),
    /// Merge a partial update into the post with this id, if present.
    Patch { id: PostId, patch: PostPatch },
    /// Swap the post with this id for another one in place, if present.
    Replace { id: PostId, post: Post },
    /// Put a post back at `index` (clamped) unless its id is already present.
    Restore { index: usize, post: Post },
    /// Change who is looking at the feed. Every view is re-derived.
    SetViewer(Option<UserId>),
}

impl Intent for FeedIntent {}

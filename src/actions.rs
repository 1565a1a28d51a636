//! User-facing feed actions.
//!
//! Glue between gestures (tap like, submit comment, publish a thread) and
//! the optimistic store: each action computes the local change from the
//! current view, applies it through [`FeedStore`], and backs it with one
//! [`FeedApi`] call. Errors come back after the store has rolled back, so
//! callers only need to show them.

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::{
    ApiError, CreateCommentInput, CreatePostInput, FavoriteToggled, FeedApi, LikeToggled,
};
use crate::composer::ComposerState;
use crate::feed::FeedStore;
use crate::model::{
    Comment, CommentId, Favorite, FieldValue, Like, Media, Post, PostField, PostId, PostPatch,
    PostView, UserId, Visibility,
};

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Sign in to like, comment or post")]
    NotSignedIn,

    #[error("Post '{0}' is not in the feed")]
    PostNotFound(PostId),

    #[error("Comment is empty")]
    EmptyComment,

    #[error("Post has no content or media")]
    EmptyPost,

    #[error(transparent)]
    Api(#[from] ApiError),
}

pub struct FeedActions<A> {
    store: FeedStore,
    api: A,
}

impl<A: FeedApi> FeedActions<A> {
    pub fn new(store: FeedStore, api: A) -> Self {
        Self { store, api }
    }

    pub fn store(&self) -> &FeedStore {
        &self.store
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Hydrate the store with the latest feed.
    pub async fn refresh(&self) -> Result<usize, ActionError> {
        let posts = self.api.latest_feed().await?;
        let count = posts.len();
        self.store.replace_all(posts);
        info!(posts = count, "Feed refreshed");
        Ok(count)
    }

    /// Re-fetch one post and swap it into the feed.
    pub async fn reload_post(&self, id: &PostId) -> Result<(), ActionError> {
        let post = self.api.post_by_id(id).await?;
        self.store.replace(id, post);
        Ok(())
    }

    /// Re-fetch the comments of one post.
    pub async fn reload_comments(&self, id: &PostId) -> Result<(), ActionError> {
        let comments = self.api.comments_for_post(id).await?;
        self.store.patch(id, PostPatch::new().comments(comments));
        Ok(())
    }

    pub async fn toggle_like(&self, id: &PostId) -> Result<LikeToggled, ActionError> {
        let viewer = self.viewer()?;
        let view = self.view(id)?;

        let liking = !view.has_liked();
        let likes = if liking {
            let mut likes = view.post().likes.clone();
            likes.push(Like::new(viewer.clone(), id.as_str()));
            likes
        } else {
            view.post()
                .likes
                .iter()
                .filter(|like| like.user_id != viewer)
                .cloned()
                .collect()
        };

        debug!(post = %id, liking, "Toggling like");
        let toggled = self
            .store
            .optimistic_update(id, PostPatch::new().likes(likes), || {
                self.api.toggle_like(id)
            })
            .await
            .inspect_err(|e| warn!(post = %id, error = %e, "Like rolled back"))?;

        if toggled.liked != liking {
            warn!(post = %id, expected = liking, server = toggled.liked, "Server like state differs");
        }
        Ok(toggled)
    }

    pub async fn toggle_favorite(&self, id: &PostId) -> Result<FavoriteToggled, ActionError> {
        let viewer = self.viewer()?;
        let view = self.view(id)?;

        let favoriting = !view.has_favorited();
        let favorites = if favoriting {
            let mut favorites = view.post().favorites.clone();
            favorites.push(Favorite::new(viewer.clone(), id.clone()));
            favorites
        } else {
            view.post()
                .favorites
                .iter()
                .filter(|fav| fav.user_id != viewer)
                .cloned()
                .collect()
        };

        debug!(post = %id, favoriting, "Toggling favorite");
        let toggled = self
            .store
            .optimistic_update(id, PostPatch::new().favorites(favorites), || {
                self.api.toggle_favorite(id)
            })
            .await
            .inspect_err(|e| warn!(post = %id, error = %e, "Favorite rolled back"))?;

        if toggled.favorited != favoriting {
            warn!(post = %id, expected = favoriting, server = toggled.favorited, "Server favorite state differs");
        }
        Ok(toggled)
    }

    /// Append a comment now; once the server stores it, its copy replaces
    /// the placeholder.
    pub async fn add_comment(&self, id: &PostId, content: &str) -> Result<Comment, ActionError> {
        let viewer = self.viewer()?;
        let content = content.trim();
        if content.is_empty() {
            return Err(ActionError::EmptyComment);
        }
        let view = self.view(id)?;

        let placeholder_id = CommentId::new(format!("pending-{}", uuid::Uuid::new_v4()));
        let mut comments = view.post().comments.clone();
        comments.push(Comment::new(
            placeholder_id.clone(),
            id.clone(),
            viewer,
            content,
        ));

        let input = CreateCommentInput {
            post_id: id.clone(),
            content: content.to_string(),
        };
        let result = self
            .store
            .optimistic_update(id, PostPatch::new().comments(comments), || {
                self.api.create_comment(&input)
            })
            .await;

        // Comments added meanwhile carry this placeholder in their own writes.
        let created = match result {
            Ok(created) => {
                self.store.rewrite(id, PostField::Comments, |value| {
                    if let FieldValue::Comments(comments) = value {
                        for comment in comments.iter_mut().filter(|c| c.id == placeholder_id) {
                            *comment = created.clone();
                        }
                    }
                });
                created
            }
            Err(e) => {
                warn!(post = %id, error = %e, "Comment rolled back");
                self.store.rewrite(id, PostField::Comments, |value| {
                    if let FieldValue::Comments(comments) = value {
                        comments.retain(|c| c.id != placeholder_id);
                    }
                });
                return Err(e.into());
            }
        };
        info!(post = %id, comment = %created.id, "Comment added");
        Ok(created)
    }

    /// Show the new post at the top of the feed now; once the server stores
    /// it, its copy replaces the placeholder.
    pub async fn create_post(&self, input: CreatePostInput) -> Result<Post, ActionError> {
        let viewer = self.viewer()?;
        if input.is_blank() {
            return Err(ActionError::EmptyPost);
        }

        let placeholder = placeholder_post(&viewer, &input);
        let placeholder_id = placeholder.id.clone();
        let author = self
            .store
            .posts()
            .into_iter()
            .find_map(|view| view.into_post().author.filter(|a| a.id == viewer));
        let placeholder = Post {
            author: author.clone(),
            ..placeholder
        };

        let mut created = self
            .store
            .optimistic_add(placeholder, || self.api.create_post(&input))
            .await
            .inspect_err(|e| warn!(error = %e, "New post rolled back"))?;

        if created.author.is_none() {
            created.author = author;
        }
        self.store.replace(&placeholder_id, created.clone());
        info!(post = %created.id, "Post created");
        Ok(created)
    }

    pub async fn delete_post(&self, id: &PostId) -> Result<(), ActionError> {
        self.viewer()?;
        self.view(id)?;

        self.store
            .optimistic_remove(id, || self.api.delete_post(id))
            .await
            .inspect_err(|e| warn!(post = %id, error = %e, "Delete rolled back"))?;
        info!(post = %id, "Post deleted");
        Ok(())
    }

    /// Publish every non-blank draft as its own post, in thread order.
    /// Stops at the first failure; posts already created stay.
    pub async fn publish_thread(
        &self,
        composer: &ComposerState,
        visibility: Visibility,
    ) -> Result<Vec<Post>, ActionError> {
        let inputs = composer.to_inputs(visibility);
        if inputs.is_empty() {
            return Err(ActionError::EmptyPost);
        }

        let mut created = Vec::with_capacity(inputs.len());
        for input in inputs {
            created.push(self.create_post(input).await?);
        }
        Ok(created)
    }

    fn viewer(&self) -> Result<UserId, ActionError> {
        self.store.viewer().ok_or(ActionError::NotSignedIn)
    }

    fn view(&self, id: &PostId) -> Result<PostView, ActionError> {
        self.store
            .get(id)
            .ok_or_else(|| ActionError::PostNotFound(id.clone()))
    }
}

fn placeholder_post(viewer: &UserId, input: &CreatePostInput) -> Post {
    let id = PostId::new(format!("pending-{}", uuid::Uuid::new_v4()));
    let media = input
        .media
        .iter()
        .enumerate()
        .map(|(order, upload)| Media {
            id: format!("{}-media-{}", id, order),
            media_url: upload.media_url.clone(),
            media_type: upload.media_type,
            media_order: order as u32,
            media_size: upload.media_size,
            file_hash: upload.file_hash.clone(),
            file_key: upload.file_key.clone(),
            file_type: upload.file_type.clone(),
        })
        .collect();

    Post {
        content: input.content.clone(),
        visibility: input.visibility,
        post_type: input.post_type,
        created_at: Utc::now(),
        media,
        ..Post::new(id, viewer.clone())
    }
}

//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_server;

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;

use bluefeed::api::{
    ApiError, CreateCommentInput, CreatePostInput, FavoriteToggled, FeedApi, LikeToggled,
};
use bluefeed::model::{Comment, Like, Post, PostId, UserId};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tempfile::TempDir;
use tokio::sync::oneshot;

// -- Fixtures -----------------------------------------------------------------

/// A text post by `author` with one like per user in `liked_by`.
pub fn post(id: &str, author: &str, liked_by: &[&str]) -> Post {
    let likes = liked_by
        .iter()
        .map(|user| Like::new(UserId::from(*user), id))
        .collect();
    Post::new(id, author)
        .with_content(format!("post {}", id))
        .with_likes(likes)
}

pub fn likes(post_id: &str, users: &[&str]) -> Vec<Like> {
    users
        .iter()
        .map(|user| Like::new(UserId::from(*user), post_id))
        .collect()
}

pub fn like_users(post: &Post) -> Vec<String> {
    post.likes.iter().map(|l| l.user_id.to_string()).collect()
}

/// Write `content` to a `config.toml` inside a fresh temp dir.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}

pub fn network_error(procedure: &str) -> ApiError {
    ApiError::Transport {
        procedure: procedure.to_string(),
        message: "connection reset".to_string(),
    }
}

// -- Scripted API -------------------------------------------------------------

pub type Gate = oneshot::Sender<Result<Value, ApiError>>;

enum Reply {
    Ready(Result<Value, ApiError>),
    Gated(oneshot::Receiver<Result<Value, ApiError>>),
}

#[derive(Default)]
struct Script {
    replies: HashMap<String, VecDeque<Reply>>,
    calls: Vec<String>,
}

/// In-memory [`FeedApi`] answering each procedure from a per-procedure queue.
///
/// Replies are consumed in order. A gated reply keeps the call pending until
/// the test sends through the returned [`Gate`]. Unscripted calls fail with a
/// 500.
#[derive(Default)]
pub struct FakeFeedApi {
    script: Mutex<Script>,
}

impl FakeFeedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply_ok(&self, procedure: &str, value: impl Serialize) {
        let value = serde_json::to_value(value).expect("Failed to encode scripted reply");
        self.push(procedure, Reply::Ready(Ok(value)));
    }

    pub fn reply_err(&self, procedure: &str, err: ApiError) {
        self.push(procedure, Reply::Ready(Err(err)));
    }

    /// Queue a reply that is only delivered once the gate is sent.
    pub fn gate(&self, procedure: &str) -> Gate {
        let (tx, rx) = oneshot::channel();
        self.push(procedure, Reply::Gated(rx));
        tx
    }

    /// Procedures called so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.script.lock().calls.clone()
    }

    fn push(&self, procedure: &str, reply: Reply) {
        self.script
            .lock()
            .replies
            .entry(procedure.to_string())
            .or_default()
            .push_back(reply);
    }

    async fn call<O: DeserializeOwned>(&self, procedure: &str) -> Result<O, ApiError> {
        let reply = {
            let mut script = self.script.lock();
            script.calls.push(procedure.to_string());
            script
                .replies
                .get_mut(procedure)
                .and_then(|queue| queue.pop_front())
        };

        let result = match reply {
            Some(Reply::Ready(result)) => result,
            Some(Reply::Gated(rx)) => rx.await.unwrap_or_else(|_| Err(network_error(procedure))),
            None => Err(ApiError::Server {
                status: 500,
                message: format!("no reply scripted for {}", procedure),
            }),
        };

        result.and_then(|value| {
            serde_json::from_value(value).map_err(|e| ApiError::Decode {
                procedure: procedure.to_string(),
                source: e,
            })
        })
    }
}

impl FeedApi for FakeFeedApi {
    async fn latest_feed(&self) -> Result<Vec<Post>, ApiError> {
        self.call("post.getLatestFeed").await
    }

    async fn post_by_id(&self, _id: &PostId) -> Result<Post, ApiError> {
        self.call("post.getById").await
    }

    async fn toggle_like(&self, _id: &PostId) -> Result<LikeToggled, ApiError> {
        self.call("post.toggleLike").await
    }

    async fn toggle_favorite(&self, _id: &PostId) -> Result<FavoriteToggled, ApiError> {
        self.call("post.toggleFavorite").await
    }

    async fn create_comment(&self, _input: &CreateCommentInput) -> Result<Comment, ApiError> {
        self.call("comment.create").await
    }

    async fn comments_for_post(&self, _id: &PostId) -> Result<Vec<Comment>, ApiError> {
        self.call("comment.byPostId").await
    }

    async fn create_post(&self, _input: &CreatePostInput) -> Result<Post, ApiError> {
        self.call("post.create").await
    }

    async fn delete_post(&self, _id: &PostId) -> Result<(), ApiError> {
        self.call::<serde::de::IgnoredAny>("post.delete").await?;
        Ok(())
    }
}

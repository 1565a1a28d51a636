//! Canonical feed entities as the server returns them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Identifier of a post (a UUID on the server, opaque here).
    PostId
);
string_id!(
    /// Identifier of a user as issued by the auth provider.
    UserId
);
string_id!(
    /// Identifier of a comment or a reply.
    CommentId
);

/// Who can see a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Followers,
    CloseFriends,
}

impl Visibility {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "public" => Some(Visibility::Public),
            "followers" => Some(Visibility::Followers),
            "close_friends" => Some(Visibility::CloseFriends),
            _ => None,
        }
    }
}

/// Layout of a post: plain text, or a media carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostType {
    #[default]
    Text,
    Carousel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Image,
    Video,
}

/// Public profile fields embedded in posts and comments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: UserId,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Author {
    /// Name to show for this author: username, display name, or the raw id.
    pub fn handle(&self) -> &str {
        self.username
            .as_deref()
            .or(self.display_name.as_deref())
            .unwrap_or_else(|| self.id.as_str())
    }
}

/// An uploaded image or video attached to a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: String,
    pub media_url: String,
    pub media_type: MediaType,
    #[serde(default)]
    pub media_order: u32,
    #[serde(default)]
    pub media_size: u64,
    pub file_hash: String,
    pub file_key: String,
    pub file_type: String,
}

/// A user's like on a post or comment (`entity_id`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub user_id: UserId,
    pub entity_id: String,
    pub created_at: DateTime<Utc>,
}

impl Like {
    pub fn new(user_id: UserId, entity_id: impl Into<String>) -> Self {
        Self {
            user_id,
            entity_id: entity_id.into(),
            created_at: Utc::now(),
        }
    }
}

/// A user's favorite (bookmark) of a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub user_id: UserId,
    pub post_id: PostId,
    pub created_at: DateTime<Utc>,
}

impl Favorite {
    pub fn new(user_id: UserId, post_id: PostId) -> Self {
        Self {
            user_id,
            post_id,
            created_at: Utc::now(),
        }
    }
}

/// A reply linking a parent comment to the comment that answers it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentReply {
    pub id: CommentId,
    pub comment_id: CommentId,
    pub reply_id: CommentId,
    pub user_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub user_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub user: Option<Author>,
    #[serde(default)]
    pub replies: Vec<CommentReply>,
    #[serde(default)]
    pub likes: Vec<Like>,
}

impl Comment {
    pub fn new(
        id: CommentId,
        post_id: PostId,
        user_id: UserId,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            post_id,
            user_id,
            content: content.into(),
            created_at: Utc::now(),
            user: None,
            replies: Vec::new(),
            likes: Vec::new(),
        }
    }
}

/// A post with all relations the feed renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub user_id: UserId,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub post_type: PostType,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub media: Vec<Media>,
    #[serde(default)]
    pub likes: Vec<Like>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub favorites: Vec<Favorite>,
}

impl Post {
    /// A bare text post with no relations, created now.
    pub fn new(id: impl Into<PostId>, user_id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            content: None,
            visibility: Visibility::default(),
            post_type: PostType::default(),
            created_at: Utc::now(),
            updated_at: None,
            author: None,
            media: Vec::new(),
            likes: Vec::new(),
            comments: Vec::new(),
            favorites: Vec::new(),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_likes(mut self, likes: Vec<Like>) -> Self {
        self.likes = likes;
        self
    }

    pub fn liked_by(&self, user: &UserId) -> bool {
        self.likes.iter().any(|like| &like.user_id == user)
    }

    pub fn favorited_by(&self, user: &UserId) -> bool {
        self.favorites.iter().any(|fav| &fav.user_id == user)
    }

    pub fn commented_by(&self, user: &UserId) -> bool {
        self.comments.iter().any(|comment| &comment.user_id == user)
    }

    /// Name to show for the author of this post.
    pub fn author_handle(&self) -> &str {
        self.author
            .as_ref()
            .map(Author::handle)
            .unwrap_or_else(|| self.user_id.as_str())
    }
}

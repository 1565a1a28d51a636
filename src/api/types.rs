//! Request and response payloads of the server procedures.

use serde::{Deserialize, Serialize};

use crate::model::{MediaType, PostId, PostType, Visibility};

/// A file the upload service has already stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaUpload {
    pub media_url: String,
    pub media_type: MediaType,
    pub media_size: u64,
    pub file_hash: String,
    pub file_key: String,
    pub file_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub post_type: PostType,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<MediaUpload>,
}

impl CreatePostInput {
    /// A public text post.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            post_type: PostType::Text,
            visibility: Visibility::Public,
            media: Vec::new(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.content.as_deref().map_or(true, |c| c.trim().is_empty()) && self.media.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentInput {
    pub post_id: PostId,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeToggled {
    pub liked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteToggled {
    pub favorited: bool,
}

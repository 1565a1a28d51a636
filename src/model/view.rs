//! Viewer-relative view-models.

use serde::Serialize;

use super::post::{Post, PostId, UserId};

/// Like and comment totals shown under a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Engagement {
    pub likes: usize,
    pub comments: usize,
}

/// A post as the presentation layer sees it: canonical data plus flags
/// describing the current viewer's relationship to it.
///
/// Only [`PostView::derive`] produces the derived fields, so they can never
/// drift from the canonical data they summarize.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostView {
    #[serde(flatten)]
    post: Post,
    #[serde(rename = "_count")]
    counts: Engagement,
    #[serde(rename = "_hasLiked")]
    has_liked: bool,
    #[serde(rename = "_hasFavorited")]
    has_favorited: bool,
    #[serde(rename = "_hasCommented")]
    has_commented: bool,
}

impl PostView {
    /// Derive the view of `post` for `viewer`. Anonymous viewers have no
    /// relationship to any post.
    pub fn derive(post: Post, viewer: Option<&UserId>) -> Self {
        let counts = Engagement {
            likes: post.likes.len(),
            comments: post.comments.len(),
        };
        let (has_liked, has_favorited, has_commented) = match viewer {
            Some(user) => (
                post.liked_by(user),
                post.favorited_by(user),
                post.commented_by(user),
            ),
            None => (false, false, false),
        };

        Self {
            post,
            counts,
            has_liked,
            has_favorited,
            has_commented,
        }
    }

    pub fn id(&self) -> &PostId {
        &self.post.id
    }

    pub fn post(&self) -> &Post {
        &self.post
    }

    pub fn into_post(self) -> Post {
        self.post
    }

    pub fn counts(&self) -> Engagement {
        self.counts
    }

    pub fn has_liked(&self) -> bool {
        self.has_liked
    }

    pub fn has_favorited(&self) -> bool {
        self.has_favorited
    }

    pub fn has_commented(&self) -> bool {
        self.has_commented
    }
}

/// Format a count in en-US compact notation with at most one fraction
/// digit: `999`, `1.2K`, `15K`, `1M`, `2.5B`.
pub fn format_compact_number(n: u64) -> String {
    const UNITS: [(u64, &str); 4] = [
        (1_000_000_000_000, "T"),
        (1_000_000_000, "B"),
        (1_000_000, "M"),
        (1_000, "K"),
    ];

    for (index, &(scale, suffix)) in UNITS.iter().enumerate() {
        if n < scale {
            continue;
        }
        // Round half up to tenths.
        let tenths = ((n as u128) * 10 + (scale as u128) / 2) / scale as u128;
        // 999_950 rounds to 1000.0K, which compact notation shows as 1M.
        if tenths >= 10_000 && index > 0 {
            let (_, bigger) = UNITS[index - 1];
            return format!("1{}", bigger);
        }
        return if tenths % 10 == 0 {
            format!("{}{}", tenths / 10, suffix)
        } else {
            format!("{}.{}{}", tenths / 10, tenths % 10, suffix)
        };
    }

    n.to_string()
}

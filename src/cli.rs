//! Command-line interface of the `bluefeed` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::model::{format_compact_number, PostView, Visibility};

/// Read and act on the feed from a terminal.
#[derive(Parser, Debug)]
#[command(name = "bluefeed", version, about = "Feed client with optimistic updates")]
pub struct Cli {
    /// Path to the config file (default: ~/.config/bluefeed/config.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Act as this user id instead of `viewer.user_id` from the config.
    #[arg(long, global = true)]
    pub viewer: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Print the latest feed.
    Feed,

    /// Like or unlike a post.
    Like { id: String },

    /// Save or unsave a post.
    Favorite { id: String },

    /// Comment on a post.
    Comment { id: String, text: String },

    /// Publish a text post.
    Post {
        /// public, followers or close-friends.
        #[arg(long, default_value = "public", value_parser = parse_visibility)]
        visibility: Visibility,
        text: String,
    },

    /// Delete one of your posts.
    Delete { id: String },
}

fn parse_visibility(s: &str) -> Result<Visibility, String> {
    Visibility::parse(s).ok_or_else(|| {
        format!(
            "unknown visibility '{}' (expected public, followers or close-friends)",
            s
        )
    })
}

/// One line per post: id, author, counts, viewer markers and a content
/// preview.
pub fn render_post_line(view: &PostView) -> String {
    const PREVIEW_CHARS: usize = 60;

    let post = view.post();
    let counts = view.counts();
    let mut line = format!(
        "{}  @{}  {} likes  {} comments",
        post.id,
        post.author_handle(),
        format_compact_number(counts.likes as u64),
        format_compact_number(counts.comments as u64),
    );
    if view.has_liked() {
        line.push_str("  [liked]");
    }
    if view.has_favorited() {
        line.push_str("  [saved]");
    }
    if let Some(content) = post.content.as_deref() {
        let first_line = content.lines().next().unwrap_or_default();
        let mut preview: String = first_line.chars().take(PREVIEW_CHARS).collect();
        if first_line.chars().count() > PREVIEW_CHARS || content.lines().nth(1).is_some() {
            preview.push('…');
        }
        line.push_str("  ");
        line.push_str(&preview);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Like, Post, UserId};

    #[test]
    fn line_shows_compact_counts_and_markers() {
        let likes = (0..1_234)
            .map(|i| Like::new(UserId::new(format!("u{}", i)), "p1"))
            .collect();
        let post = Post::new("p1", "ada").with_content("hello\nworld").with_likes(likes);
        let view = PostView::derive(post, Some(&UserId::from("u7")));

        let line = render_post_line(&view);
        assert_eq!(line, "p1  @ada  1.2K likes  0 comments  [liked]  hello…");
    }
}

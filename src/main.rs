use anyhow::{Context, Result};
use clap::Parser;

use bluefeed::actions::FeedActions;
use bluefeed::api::{CreatePostInput, HttpFeedApi};
use bluefeed::cli::{render_post_line, Cli, Command};
use bluefeed::config::Config;
use bluefeed::feed::FeedStore;
use bluefeed::logging::init_tracing;
use bluefeed::model::{PostId, UserId};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;

    let viewer = cli
        .viewer
        .clone()
        .or_else(|| config.viewer.user_id.clone())
        .map(UserId::from);
    tracing::debug!(base_url = %config.api.base_url, viewer = ?viewer, "Starting");

    let api = HttpFeedApi::new(&config.api).context("Failed to build API client")?;
    let actions = FeedActions::new(FeedStore::with_viewer(viewer), api);

    actions.refresh().await.context("Failed to load the feed")?;
    let outcome = run(&actions, cli.command).await;

    for view in actions.store().posts() {
        println!("{}", render_post_line(&view));
    }
    outcome
}

async fn run(actions: &FeedActions<HttpFeedApi>, command: Command) -> Result<()> {
    match command {
        Command::Feed => {}
        Command::Like { id } => {
            let toggled = actions
                .toggle_like(&PostId::from(id))
                .await
                .context("Like failed")?;
            eprintln!("{}", if toggled.liked { "Liked" } else { "Unliked" });
        }
        Command::Favorite { id } => {
            let toggled = actions
                .toggle_favorite(&PostId::from(id))
                .await
                .context("Save failed")?;
            eprintln!("{}", if toggled.favorited { "Saved" } else { "Removed from saved" });
        }
        Command::Comment { id, text } => {
            actions
                .add_comment(&PostId::from(id), &text)
                .await
                .context("Comment failed")?;
        }
        Command::Post { visibility, text } => {
            let input = CreatePostInput {
                visibility,
                ..CreatePostInput::text(text)
            };
            let post = actions.create_post(input).await.context("Post failed")?;
            eprintln!("Posted {}", post.id);
        }
        Command::Delete { id } => {
            actions
                .delete_post(&PostId::from(id))
                .await
                .context("Delete failed")?;
        }
    }
    Ok(())
}

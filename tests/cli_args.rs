use bluefeed::cli::{Cli, Command};
use bluefeed::model::Visibility;
use clap::Parser;

#[test]
fn test_feed_with_global_flags() {
    let cli = Cli::try_parse_from(["bluefeed", "feed", "--viewer", "u1", "--config", "/tmp/c.toml"])
        .unwrap();

    assert_eq!(cli.command, Command::Feed);
    assert_eq!(cli.viewer.as_deref(), Some("u1"));
    assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/tmp/c.toml")));
}

#[test]
fn test_comment_takes_id_and_text() {
    let cli = Cli::try_parse_from(["bluefeed", "comment", "p1", "nice shot"]).unwrap();

    assert_eq!(
        cli.command,
        Command::Comment {
            id: "p1".to_string(),
            text: "nice shot".to_string(),
        }
    );
}

#[test]
fn test_post_visibility_defaults_to_public() {
    let cli = Cli::try_parse_from(["bluefeed", "post", "hello"]).unwrap();

    assert_eq!(
        cli.command,
        Command::Post {
            visibility: Visibility::Public,
            text: "hello".to_string(),
        }
    );
}

#[test]
fn test_post_accepts_close_friends() {
    let cli =
        Cli::try_parse_from(["bluefeed", "post", "--visibility", "close-friends", "hi"]).unwrap();

    assert!(matches!(
        cli.command,
        Command::Post {
            visibility: Visibility::CloseFriends,
            ..
        }
    ));
}

#[test]
fn test_unknown_visibility_is_rejected() {
    let result = Cli::try_parse_from(["bluefeed", "post", "--visibility", "everyone", "hi"]);
    assert!(result.is_err());
}

#[test]
fn test_missing_command_is_rejected() {
    assert!(Cli::try_parse_from(["bluefeed"]).is_err());
}

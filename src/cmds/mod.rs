use regex::Regex;

use crate::entities::{CommentId, PostId, UserId};

pub mod parser;

use parser::*;

/// a tiny social feed: post, like, comment, share.
#[derive(Debug, Clone, ::clap::Parser)]
#[clap(author, version)]
pub struct App {
    /// `memory`, `file:<path>` or a mongodb uri.
    /// falls back to `FEED_STORE`, then `file:feed.json`.
    #[clap(long, parse(try_from_str = parse_store_target))]
    pub store: Option<StoreTarget>,

    /// u64, acting user (default: 1).
    #[clap(long = "as", name = "USER_ID")]
    pub acting: Option<UserId>,

    /// without a command an interactive shell is started.
    #[clap(subcommand)]
    pub cmd: Option<FeedCmd>,
}

/// one line typed into the shell.
#[derive(Debug, Clone, ::clap::Parser)]
#[clap(name = "feed")]
pub struct Line {
    #[clap(subcommand)]
    pub cmd: FeedCmd,
}

#[derive(Debug, Clone, ::clap::Subcommand)]
pub enum FeedCmd {
    /// post text, an image, or both. a staged image is used when `--image` is absent.
    #[clap(short_flag = 'p')]
    Post {
        #[clap(name = "TEXT")]
        text: Vec<String>,

        /// file path or http(s) url of an image.
        #[clap(short, long)]
        image: Option<String>,
    },

    /// share someone else's post.
    #[clap(short_flag = 's')]
    Share {
        #[clap(name = "POST_ID")]
        post_id: PostId,
    },

    /// like a post, or take the like back.
    #[clap(short_flag = 'l')]
    Like {
        #[clap(name = "POST_ID")]
        post_id: PostId,
    },

    /// comment on a post. defaults to the open post.
    #[clap(short_flag = 'c')]
    Comment {
        #[clap(long)]
        post: Option<PostId>,

        #[clap(name = "TEXT", required = true)]
        text: Vec<String>,
    },

    /// edit one of your comments.
    EditComment {
        #[clap(name = "POST_ID")]
        post_id: PostId,

        #[clap(name = "COMMENT_ID")]
        comment_id: CommentId,

        #[clap(name = "TEXT", required = true)]
        text: Vec<String>,
    },

    /// delete one of your comments.
    DeleteComment {
        #[clap(name = "POST_ID")]
        post_id: PostId,

        #[clap(name = "COMMENT_ID")]
        comment_id: CommentId,
    },

    /// list comments of a post. defaults to the open post.
    Comments {
        #[clap(name = "POST_ID")]
        post_id: Option<PostId>,
    },

    /// show the feed, newest first.
    #[clap(short_flag = 'f')]
    Feed {
        /// only posts of this user.
        #[clap(long)]
        user: Option<UserId>,

        /// regex over post text and author name.
        #[clap(long, parse(try_from_str = parse_regex))]
        search: Option<Regex>,
    },

    /// show a profile with its statistics. defaults to yourself.
    Profile {
        #[clap(name = "USER_ID")]
        user_id: Option<UserId>,
    },

    /// list known users.
    Users {
        /// regex over user names.
        #[clap(long, parse(try_from_str = parse_regex))]
        search: Option<Regex>,
    },

    /// act as another user.
    Switch {
        #[clap(name = "USER_ID")]
        user_id: UserId,
    },

    /// show the acting user.
    Whoami,

    /// open a post's comment thread.
    Open {
        #[clap(name = "POST_ID")]
        post_id: PostId,
    },

    /// close the open comment thread.
    Close,

    /// stage an image for the next post.
    Attach {
        #[clap(name = "SOURCE")]
        src: String,
    },

    /// drop the staged image.
    Detach,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn line(words: &[&str]) -> FeedCmd {
        Line::try_parse_from(std::iter::once("feed").chain(words.iter().copied()))
            .unwrap()
            .cmd
    }

    #[test]
    fn parses_multiword_text() {
        match line(&["post", "hello", "there", "--image", "a.png"]) {
            FeedCmd::Post { text, image } => {
                assert_eq!(join_words(&text), "hello there");
                assert_eq!(image.as_deref(), Some("a.png"));
            },
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn kebab_case_subcommands() {
        assert!(matches!(
            line(&["edit-comment", "1", "2", "fixed"]),
            FeedCmd::EditComment {
                post_id: PostId(1),
                comment_id: CommentId(2),
                ..
            }
        ));
        assert!(matches!(line(&["close"]), FeedCmd::Close));
    }

    #[test]
    fn comment_requires_text() {
        assert!(Line::try_parse_from(["feed", "comment"]).is_err());
    }

    #[test]
    fn app_options() {
        let app = App::try_parse_from(["feed", "--store", "memory", "--as", "2", "whoami"]).unwrap();

        assert_eq!(app.store, Some(StoreTarget::Memory));
        assert_eq!(app.acting, Some(UserId(2)));
        assert!(matches!(app.cmd, Some(FeedCmd::Whoami)));
    }
}

use chrono::Utc;
use clap::ErrorKind;
use clap::Parser;

use crate::cmds::parser::join_words;
use crate::cmds::{FeedCmd, Line};
use crate::entities::{CommentId, Post, PostId, UserId};
use crate::error::{FeedError, Result};
use crate::interactors::{FeedManager, PostQuery};
use crate::intake::read_image;
use crate::presenters::{
    resp_from_comment, resp_from_like, resp_from_post, resp_from_profile, resp_from_user,
    resp_message, PostView, Response,
};
use crate::session::Session;
use crate::utils::LetChain;

/// runs commands against the feed on behalf of the session's user.
pub struct Conductor {
    pub feed: FeedManager,
    pub session: Session,
}

impl Conductor {
    pub fn new(feed: FeedManager, session: Session) -> Self { Self { feed, session } }

    /// starts a session acting as `user_id`, which must be in the directory.
    pub fn acting_as(feed: FeedManager, user_id: UserId) -> Result<Self> {
        match feed.users().contains(user_id) {
            true => Ok(Self::new(feed, Session::new(user_id))),
            false => Err(FeedError::user_not_found(user_id)),
        }
    }

    /// parses and runs one shell line. every failure is turned into an `error` response.
    pub async fn conduct_line(&mut self, line: &str) -> Vec<Response> {
        let words = match shell_words::split(line) {
            Ok(w) => w,
            Err(e) => return vec![resp_message("error", e)],
        };
        if words.is_empty() {
            return vec![];
        }

        let Line { cmd } = match Line::try_parse_from(std::iter::once("feed".to_string()).chain(words))
        {
            Ok(l) => l,
            Err(e) => {
                let title = match e.kind() {
                    ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => "help",
                    _ => "error",
                };
                return vec![resp_message(title, e.to_string().trim_end())];
            },
        };

        match self.conduct(cmd).await {
            Ok(r) => r,
            Err(e) => vec![resp_message("error", e)],
        }
    }

    #[tracing::instrument(skip(self), fields(user = %self.session.current_user))]
    pub async fn conduct(&mut self, cmd: FeedCmd) -> Result<Vec<Response>> {
        let me = self.session.current_user;

        let res = match cmd {
            FeedCmd::Post { text, image } => {
                let image = match image {
                    Some(src) => Some(read_image(&src).await?),
                    None => self.session.pending_image.clone(),
                };

                let post = self.feed.create_post(me, join_words(&text), image).await?;
                self.session.pending_image = None;

                vec![self.render_post("posted", &post).await?]
            },

            FeedCmd::Share { post_id } => {
                let post = self.feed.share_post(me, post_id).await?;

                vec![self.render_post("shared post", &post).await?]
            },

            FeedCmd::Like { post_id } => self
                .feed
                .toggle_like(post_id, me)
                .await?
                .let_(|state| vec![resp_from_like(post_id, state)]),

            FeedCmd::Comment { post, text } => {
                let post_id = self.target_post(post)?;
                let comment = self.feed.add_comment(post_id, me, join_words(&text)).await?;

                vec![resp_from_comment(
                    format!("commented on {}", post_id),
                    &comment,
                    self.feed.users().find(me),
                    Utc::now(),
                )]
            },

            FeedCmd::EditComment {
                post_id,
                comment_id,
                text,
            } => {
                self.check_author(post_id, comment_id).await?;
                let comment = self
                    .feed
                    .edit_comment(post_id, comment_id, join_words(&text))
                    .await?;

                vec![resp_from_comment(
                    "edited comment",
                    &comment,
                    self.feed.users().find(comment.user_id),
                    Utc::now(),
                )]
            },

            FeedCmd::DeleteComment {
                post_id,
                comment_id,
            } => {
                self.check_author(post_id, comment_id).await?;

                let removed = self.feed.delete_comment(post_id, comment_id).await?;

                vec![match removed {
                    true => resp_message("deleted comment", comment_id),
                    false => resp_message("nothing deleted", format!("no comment {}", comment_id)),
                }]
            },

            FeedCmd::Comments { post_id } => {
                let post_id = self.target_post(post_id)?;
                self.render_thread(post_id).await?
            },

            FeedCmd::Feed { user, search } => {
                let posts = self
                    .feed
                    .search_posts(PostQuery {
                        author: user,
                        text: search,
                    })
                    .await?;

                if posts.is_empty() {
                    return Ok(vec![resp_message("feed", "no posts yet.")]);
                }

                let mut res = Vec::with_capacity(posts.len());
                for post in &posts {
                    res.push(self.render_post("post", post).await?);
                }
                res
            },

            FeedCmd::Profile { user_id } => {
                let user_id = user_id.unwrap_or(me);
                let (user, stats) = self.feed.profile(user_id).await?;

                let mut res = vec![resp_from_profile(&user, stats)];
                for post in &self.feed.list_posts_by(user_id).await? {
                    res.push(self.render_post("post", post).await?);
                }
                res
            },

            FeedCmd::Users { search } => {
                let users = self.feed.users();

                match &search {
                    Some(rx) => users.search(rx).map(|u| resp_from_user("user", u)).collect(),
                    None => users.all().iter().map(|u| resp_from_user("user", u)).collect(),
                }
            },

            FeedCmd::Switch { user_id } => {
                let user = self
                    .feed
                    .users()
                    .find(user_id)
                    .ok_or_else(|| FeedError::user_not_found(user_id))?;
                self.session.current_user = user_id;

                tracing::info!("switched to user {}", user_id);
                vec![resp_from_user("now acting as", user)]
            },

            FeedCmd::Whoami => match self.feed.users().find(me) {
                Some(u) => vec![resp_from_user("acting as", u)],
                None => vec![resp_message("acting as", format!("unknown user {}", me))],
            },

            FeedCmd::Open { post_id } => {
                let post = self.feed.find_post(post_id).await?;
                self.session.current_post = Some(post_id);

                let mut res = vec![self.render_post("opened post", &post).await?];
                res.extend(self.render_thread(post_id).await?);
                res
            },

            FeedCmd::Close => match self.session.current_post.take() {
                Some(id) => vec![resp_message("closed post", id)],
                None => vec![resp_message("closed post", "nothing was open.")],
            },

            FeedCmd::Attach { src } => {
                let image = read_image(&src).await?;
                self.session.pending_image = Some(image);

                vec![resp_message("staged image", src)]
            },

            FeedCmd::Detach => match self.session.pending_image.take() {
                Some(_) => vec![resp_message("dropped image", "")],
                None => vec![resp_message("dropped image", "nothing was staged.")],
            },
        };

        Ok(res)
    }

    fn target_post(&self, given: Option<PostId>) -> Result<PostId> {
        given.or(self.session.current_post).ok_or_else(|| {
            FeedError::Validation("no post is open; give a post id".to_string())
        })
    }

    /// only the author may touch a comment. a missing comment is left for the feed to report.
    async fn check_author(&self, post_id: PostId, comment_id: CommentId) -> Result<()> {
        let me = self.session.current_user;

        match self.feed.find_comment(post_id, comment_id).await {
            Ok(c) if c.user_id != me => Err(FeedError::NotAuthor {
                user_id: me,
                comment_id,
            }),
            Ok(_) | Err(FeedError::NotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn render_post(&self, title: &str, post: &Post) -> Result<Response> {
        let users = self.feed.users();
        let viewer: UserId = self.session.current_user;

        let view = PostView {
            post,
            author: users.find(post.user_id),
            original_author: post.shared_from.and_then(|s| users.find(s.user_id)),
            likes: self.feed.like_count(post.id).await?,
            liked_by_viewer: self.feed.is_liked_by(post.id, viewer).await?,
            comments: self.feed.list_comments(post.id).await?.len(),
        };

        Ok(resp_from_post(title, view, Utc::now()))
    }

    async fn render_thread(&self, post_id: PostId) -> Result<Vec<Response>> {
        let comments = self.feed.list_comments(post_id).await?;
        if comments.is_empty() {
            return Ok(vec![resp_message(
                format!("comments on {}", post_id),
                "no comments yet.",
            )]);
        }

        let now = Utc::now();
        Ok(comments
            .iter()
            .map(|c| {
                resp_from_comment(
                    match c.user_id == self.session.current_user {
                        true => "your comment",
                        false => "comment",
                    },
                    c,
                    self.feed.users().find(c.user_id),
                    now,
                )
            })
            .collect())
    }
}

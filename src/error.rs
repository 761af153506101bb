use thiserror::Error;

use crate::entities::{CommentId, PostId, UserId};
use crate::repositories::RepositoryError;

pub type Result<T> = ::std::result::Result<T, FeedError>;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
    #[error("post {post_id} is already shared by user {user_id}")]
    AlreadyShared { user_id: UserId, post_id: PostId },
    #[error("user {user_id} is not the author of comment {comment_id}")]
    NotAuthor {
        user_id: UserId,
        comment_id: CommentId,
    },

    #[error("persistence error: {0}")]
    Persistence(#[from] RepositoryError),
    #[error("corrupt state under `{key}`: {reason}")]
    CorruptState { key: &'static str, reason: String },
}

impl FeedError {
    pub(crate) fn user_not_found(id: UserId) -> Self { Self::NotFound(format!("user {}", id)) }

    pub(crate) fn post_not_found(id: PostId) -> Self { Self::NotFound(format!("post {}", id)) }

    pub(crate) fn comment_not_found(post_id: PostId, id: CommentId) -> Self {
        Self::NotFound(format!("comment {} on post {}", id, post_id))
    }

    pub(crate) fn corrupt(key: &'static str, reason: impl ToString) -> Self {
        Self::CorruptState {
            key,
            reason: reason.to_string(),
        }
    }
}

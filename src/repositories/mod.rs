use async_trait::async_trait;

pub mod file;
pub mod mock;
pub(crate) mod models;
pub mod mongo;

type StdResult<T, E> = ::std::result::Result<T, E>;
pub type Result<T> = ::std::result::Result<T, RepositoryError>;

pub const POSTS_KEY: &str = "posts";
pub const LIKES_KEY: &str = "likes";
pub const COMMENTS_KEY: &str = "comments";

/// string-valued key-value storage the feed persists its collections into.
#[async_trait]
pub trait KeyValueStore {
    async fn load(&self, key: &str) -> Result<Option<String>>;
    async fn store(&self, key: &str, value: String) -> Result<()>;
}

#[derive(Debug, ::thiserror::Error)]
pub enum RepositoryError {
    #[error("io error: {0}")]
    Io(#[from] ::std::io::Error),
    #[error("cannot encode store file: {0}")]
    Json(#[from] ::serde_json::Error),
    /// the backing medium holds something that is not a valid store.
    #[error("store file is unreadable: {0}")]
    Corrupt(::serde_json::Error),
    #[error("internal error: {0}")]
    Internal(::anyhow::Error),
}

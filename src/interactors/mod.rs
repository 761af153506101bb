use alloc::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::directory::UserDirectory;
use crate::entities::{Post, UserId};
use crate::error::{FeedError, Result};
use crate::ids::IdGenerator;
use crate::repositories::models::{self, Comments, Likes};
use crate::repositories::{KeyValueStore, RepositoryError, COMMENTS_KEY, LIKES_KEY, POSTS_KEY};

pub mod comment;
pub mod like;
pub mod post;
pub mod profile;

pub use post::PostQuery;

/// owns the posts, likes and comments collections and every rule that mutates them.
///
/// each operation reads what it needs from the store, validates, and only then
/// writes back; a rejected call leaves the store untouched.
pub struct FeedManager {
    store: Arc<dyn KeyValueStore + Sync + Send>,
    users: UserDirectory,
    ids: IdGenerator,
    lock: Mutex<()>,
}

impl FeedManager {
    pub fn new(store: Arc<dyn KeyValueStore + Sync + Send>, users: UserDirectory) -> Self {
        Self {
            store,
            users,
            ids: IdGenerator::new(),
            lock: Mutex::new(()),
        }
    }

    pub fn users(&self) -> &UserDirectory { &self.users }

    /// fresh id above `floor`, or corrupt state under `key` once the id space is used up.
    fn next_id(&self, key: &'static str, floor: u64) -> Result<u64> {
        self.ids
            .next_above(floor)
            .ok_or_else(|| FeedError::corrupt(key, format!("no id left above {}", floor)))
    }

    fn require_user(&self, id: UserId) -> Result<()> {
        match self.users.contains(id) {
            true => Ok(()),
            false => Err(FeedError::user_not_found(id)),
        }
    }

    async fn write_lock(&self) -> MutexGuard<'_, ()> { self.lock.lock().await }

    /// raw value under `key`. a store that cannot even be read back is reported as corrupt state.
    async fn load_raw(&self, key: &'static str) -> Result<Option<String>> {
        match self.store.load(key).await {
            Err(RepositoryError::Corrupt(e)) => Err(FeedError::corrupt(key, e)),
            other => Ok(other?),
        }
    }

    async fn load_posts(&self) -> Result<Vec<Post>> {
        let raw = self.load_raw(POSTS_KEY).await?;
        models::decode_posts(raw.as_deref(), &self.users)
    }

    async fn save_posts(&self, posts: &[Post]) -> Result<()> {
        let raw = models::encode_posts(posts)?;
        self.store.store(POSTS_KEY, raw).await?;

        tracing::debug!("persisted {} posts", posts.len());
        Ok(())
    }

    async fn load_likes(&self) -> Result<Likes> {
        let raw = self.load_raw(LIKES_KEY).await?;
        models::decode_likes(raw.as_deref(), &self.users)
    }

    async fn save_likes(&self, likes: &Likes) -> Result<()> {
        let raw = models::encode_likes(likes)?;
        self.store.store(LIKES_KEY, raw).await?;

        tracing::debug!("persisted likes for {} posts", likes.len());
        Ok(())
    }

    async fn load_comments(&self) -> Result<Comments> {
        let raw = self.load_raw(COMMENTS_KEY).await?;
        models::decode_comments(raw.as_deref(), &self.users)
    }

    async fn save_comments(&self, comments: &Comments) -> Result<()> {
        let raw = models::encode_comments(comments)?;
        self.store.store(COMMENTS_KEY, raw).await?;

        tracing::debug!("persisted comments for {} posts", comments.len());
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use alloc::sync::Arc;

    use super::FeedManager;
    use crate::directory::UserDirectory;
    use crate::repositories::mock::InMemoryKeyValueStore;

    pub(crate) fn manager() -> (FeedManager, Arc<InMemoryKeyValueStore>) {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let feed = FeedManager::new(store.clone(), UserDirectory::seeded());

        (feed, store)
    }
}

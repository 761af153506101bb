use super::FeedManager;
use crate::entities::{ProfileStats, User, UserId};
use crate::error::{FeedError, Result};

impl FeedManager {
    /// post, like and comment totals for `user_id`, counted fresh from the store.
    #[tracing::instrument(skip(self))]
    pub async fn profile_stats(&self, user_id: UserId) -> Result<ProfileStats> {
        let posts = self.load_posts().await?;
        let likes = self.load_likes().await?;
        let comments = self.load_comments().await?;

        let stats = posts
            .iter()
            .filter(|p| p.user_id == user_id)
            .fold(ProfileStats::default(), |mut acc, p| {
                acc.post_count += 1;
                acc.like_count += likes.get(&p.id).map(Vec::len).unwrap_or(0);
                acc.comment_count += comments.get(&p.id).map(Vec::len).unwrap_or(0);
                acc
            });

        tracing::trace!("output - {:?}", stats);
        Ok(stats)
    }

    pub async fn profile(&self, user_id: UserId) -> Result<(User, ProfileStats)> {
        let user = self
            .users
            .find(user_id)
            .cloned()
            .ok_or_else(|| FeedError::user_not_found(user_id))?;

        Ok((user, self.profile_stats(user_id).await?))
    }
}

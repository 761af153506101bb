use super::FeedManager;
use crate::entities::{LikeState, PostId, UserId};
use crate::error::Result;

impl FeedManager {
    /// likes `post_id` for `user_id`, or takes the like back if it is already there.
    ///
    /// the post itself is not looked up: liking an unknown id just creates its entry.
    #[tracing::instrument(skip(self))]
    pub async fn toggle_like(&self, post_id: PostId, user_id: UserId) -> Result<LikeState> {
        self.require_user(user_id)?;

        let _guard = self.write_lock().await;
        let mut likes = self.load_likes().await?;

        let likers = likes.entry(post_id).or_default();
        let liked = match likers.iter().position(|u| *u == user_id) {
            Some(i) => {
                likers.remove(i);
                false
            },
            None => {
                likers.push(user_id);
                true
            },
        };
        let state = LikeState {
            liked,
            count: likers.len(),
        };

        self.save_likes(&likes).await?;

        tracing::trace!("output - {:?}", state);
        Ok(state)
    }

    pub async fn like_count(&self, post_id: PostId) -> Result<usize> {
        Ok(self
            .load_likes()
            .await?
            .get(&post_id)
            .map(Vec::len)
            .unwrap_or(0))
    }

    pub async fn is_liked_by(&self, post_id: PostId, user_id: UserId) -> Result<bool> {
        Ok(self
            .load_likes()
            .await?
            .get(&post_id)
            .map(|v| v.contains(&user_id))
            .unwrap_or(false))
    }

    pub async fn likers(&self, post_id: PostId) -> Result<Vec<UserId>> {
        Ok(self
            .load_likes()
            .await?
            .remove(&post_id)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::manager;
    use super::*;
    use crate::error::FeedError;

    #[tokio::test]
    async fn toggle_twice_restores_state() {
        let (feed, _) = manager();
        let post = feed.create_post(UserId(1), "p".into(), None).await.unwrap();
        feed.toggle_like(post.id, UserId(3)).await.unwrap();

        let before = feed.like_count(post.id).await.unwrap();
        let first = feed.toggle_like(post.id, UserId(2)).await.unwrap();
        let second = feed.toggle_like(post.id, UserId(2)).await.unwrap();

        assert_eq!(first, LikeState { liked: true, count: before + 1 });
        assert_eq!(second, LikeState { liked: false, count: before });
        assert!(!feed.is_liked_by(post.id, UserId(2)).await.unwrap());
    }

    #[tokio::test]
    async fn unknown_post_is_tolerated() {
        let (feed, _) = manager();

        let state = feed.toggle_like(PostId(999), UserId(1)).await.unwrap();

        assert_eq!(state, LikeState { liked: true, count: 1 });
        assert_eq!(feed.likers(PostId(999)).await.unwrap(), vec![UserId(1)]);
    }

    #[tokio::test]
    async fn unknown_user_is_rejected() {
        let (feed, _) = manager();

        let err = feed.toggle_like(PostId(1), UserId(77)).await.unwrap_err();

        assert!(matches!(err, FeedError::NotFound(_)));
        assert_eq!(feed.like_count(PostId(1)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn likers_keep_order() {
        let (feed, _) = manager();
        for u in [3, 1, 2] {
            feed.toggle_like(PostId(5), UserId(u)).await.unwrap();
        }

        assert_eq!(
            feed.likers(PostId(5)).await.unwrap(),
            vec![UserId(3), UserId(1), UserId(2)]
        );
    }
}

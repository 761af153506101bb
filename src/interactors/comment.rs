use chrono::Utc;

use super::FeedManager;
use crate::entities::{Comment, CommentId, PostId, UserId};
use crate::error::{FeedError, Result};
use crate::repositories::COMMENTS_KEY;
use crate::utils::{require_text, AlsoChain};

// no ownership checks here: callers decide who may edit or delete a comment.
impl FeedManager {
    #[tracing::instrument(skip(self))]
    pub async fn add_comment(
        &self,
        post_id: PostId,
        user_id: UserId,
        text: String,
    ) -> Result<Comment> {
        require_text("comment", &text)?;
        self.require_user(user_id)?;

        let _guard = self.write_lock().await;
        let mut comments = self.load_comments().await?;

        let floor = comments
            .values()
            .flatten()
            .map(|c| c.id.0)
            .max()
            .unwrap_or(0);
        let new_comment = Comment {
            id: CommentId(self.next_id(COMMENTS_KEY, floor)?),
            user_id,
            text,
            timestamp: Utc::now(),
        };

        comments
            .entry(post_id)
            .or_default()
            .push(new_comment.clone());
        self.save_comments(&comments).await?;

        tracing::info!("user {} commented {} on {}", user_id, new_comment.id, post_id);
        Ok(new_comment.also_(|o| tracing::trace!("output - {:?}", o)))
    }

    #[tracing::instrument(skip(self))]
    pub async fn edit_comment(
        &self,
        post_id: PostId,
        comment_id: CommentId,
        text: String,
    ) -> Result<Comment> {
        let _guard = self.write_lock().await;
        let mut comments = self.load_comments().await?;

        let target = comments
            .get_mut(&post_id)
            .and_then(|v| v.iter_mut().find(|c| c.id == comment_id))
            .ok_or_else(|| FeedError::comment_not_found(post_id, comment_id))?;
        require_text("comment", &text)?;

        target.text = text;
        let edited = target.clone();

        self.save_comments(&comments).await?;

        Ok(edited.also_(|o| tracing::trace!("output - {:?}", o)))
    }

    /// whether a comment was removed. the collection is written back either way.
    #[tracing::instrument(skip(self))]
    pub async fn delete_comment(&self, post_id: PostId, comment_id: CommentId) -> Result<bool> {
        let _guard = self.write_lock().await;
        let mut comments = self.load_comments().await?;

        let removed = match comments.get_mut(&post_id) {
            Some(v) => match v.iter().position(|c| c.id == comment_id) {
                Some(i) => {
                    v.remove(i);
                    true
                },
                None => false,
            },
            None => false,
        };

        self.save_comments(&comments).await?;

        tracing::debug!("removed: {}", removed);
        Ok(removed)
    }

    /// comments on `post_id`, oldest first.
    pub async fn list_comments(&self, post_id: PostId) -> Result<Vec<Comment>> {
        Ok(self
            .load_comments()
            .await?
            .remove(&post_id)
            .unwrap_or_default())
    }

    pub async fn find_comment(&self, post_id: PostId, comment_id: CommentId) -> Result<Comment> {
        self.list_comments(post_id)
            .await?
            .into_iter()
            .find(|c| c.id == comment_id)
            .ok_or_else(|| FeedError::comment_not_found(post_id, comment_id))
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::manager;
    use super::*;

    #[tokio::test]
    async fn comments_keep_insertion_order() {
        let (feed, _) = manager();

        let a = feed.add_comment(PostId(1), UserId(1), "first".into()).await.unwrap();
        let b = feed.add_comment(PostId(1), UserId(2), "second".into()).await.unwrap();

        assert_eq!(feed.list_comments(PostId(1)).await.unwrap(), vec![a, b]);
    }

    #[tokio::test]
    async fn comment_ids_are_unique_across_posts() {
        let (feed, _) = manager();

        let a = feed.add_comment(PostId(1), UserId(1), "x".into()).await.unwrap();
        let b = feed.add_comment(PostId(2), UserId(1), "y".into()).await.unwrap();

        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn blank_comment_is_rejected() {
        let (feed, _) = manager();
        feed.add_comment(PostId(1), UserId(1), "ok".into()).await.unwrap();

        let err = feed
            .add_comment(PostId(1), UserId(2), "  ".into())
            .await
            .unwrap_err();

        assert!(matches!(err, FeedError::Validation(_)));
        assert_eq!(feed.list_comments(PostId(1)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn edit_replaces_text_only() {
        let (feed, _) = manager();
        let orig = feed.add_comment(PostId(1), UserId(2), "tpyo".into()).await.unwrap();

        let edited = feed
            .edit_comment(PostId(1), orig.id, "typo".into())
            .await
            .unwrap();

        assert_eq!(edited.text, "typo");
        assert_eq!(edited.id, orig.id);
        assert_eq!(edited.user_id, orig.user_id);
        assert_eq!(edited.timestamp, orig.timestamp);
        assert_eq!(feed.list_comments(PostId(1)).await.unwrap(), vec![edited]);
    }

    #[tokio::test]
    async fn edit_errors() {
        let (feed, _) = manager();
        let c = feed.add_comment(PostId(1), UserId(2), "text".into()).await.unwrap();

        let missing = feed
            .edit_comment(PostId(2), c.id, "moved?".into())
            .await
            .unwrap_err();
        assert!(matches!(missing, FeedError::NotFound(_)));

        let blank = feed.edit_comment(PostId(1), c.id, "\n".into()).await.unwrap_err();
        assert!(matches!(blank, FeedError::Validation(_)));

        assert_eq!(feed.find_comment(PostId(1), c.id).await.unwrap().text, "text");
    }

    #[tokio::test]
    async fn delete_keeps_empty_sequence() {
        let (feed, store) = manager();
        let c = feed.add_comment(PostId(1), UserId(2), "bye".into()).await.unwrap();

        assert!(feed.delete_comment(PostId(1), c.id).await.unwrap());
        assert!(!feed.delete_comment(PostId(1), c.id).await.unwrap());
        assert!(feed.list_comments(PostId(1)).await.unwrap().is_empty());

        let raw = crate::repositories::KeyValueStore::load(&*store, "comments")
            .await
            .unwrap();
        assert_eq!(raw.as_deref(), Some(r#"{"1":[]}"#));
    }
}

use chrono::Utc;
use regex::Regex;

use super::FeedManager;
use crate::entities::{Image, Post, PostId, SharedFrom, UserId};
use crate::error::{FeedError, Result};
use crate::repositories::POSTS_KEY;
use crate::utils::{is_blank, AlsoChain};

#[derive(Debug, Clone, Default)]
pub struct PostQuery {
    pub author: Option<UserId>,
    /// matched against the content and the author's name.
    pub text: Option<Regex>,
}

impl FeedManager {
    #[tracing::instrument(skip(self, image), fields(has_image = image.is_some()))]
    pub async fn create_post(
        &self,
        user_id: UserId,
        content: String,
        image: Option<Image>,
    ) -> Result<Post> {
        if is_blank(&content) && image.is_none() {
            tracing::warn!("rejected empty post");
            return Err(FeedError::Validation(
                "post needs text or an image".to_string(),
            ));
        }
        self.require_user(user_id)?;

        let _guard = self.write_lock().await;
        let mut posts = self.load_posts().await?;

        let floor = posts.iter().map(|p| p.id.0).max().unwrap_or(0);
        let new_post = Post {
            id: PostId(self.next_id(POSTS_KEY, floor)?),
            user_id,
            content,
            image,
            timestamp: Utc::now(),
            shared_from: None,
        };

        posts.insert(0, new_post.clone());
        self.save_posts(&posts).await?;

        tracing::info!("user {} posted {}", user_id, new_post.id);
        Ok(new_post.also_(|o| tracing::trace!("output - {:?}", o)))
    }

    #[tracing::instrument(skip(self))]
    pub async fn share_post(&self, user_id: UserId, original_post_id: PostId) -> Result<Post> {
        self.require_user(user_id)?;

        let _guard = self.write_lock().await;
        let mut posts = self.load_posts().await?;

        let original = posts
            .iter()
            .find(|p| p.id == original_post_id)
            .ok_or_else(|| FeedError::post_not_found(original_post_id))?;

        if original.user_id == user_id {
            tracing::warn!("rejected self-share");
            return Err(FeedError::InvalidOperation(
                "cannot share your own post".to_string(),
            ));
        }

        if posts.iter().any(|p| p.is_share_of(user_id, original_post_id)) {
            tracing::warn!("rejected duplicated share");
            return Err(FeedError::AlreadyShared {
                user_id,
                post_id: original_post_id,
            });
        }

        let floor = posts.iter().map(|p| p.id.0).max().unwrap_or(0);
        let shared = Post {
            id: PostId(self.next_id(POSTS_KEY, floor)?),
            user_id,
            content: original.content.clone(),
            image: original.image.clone(),
            timestamp: Utc::now(),
            shared_from: Some(SharedFrom {
                post_id: original.id,
                user_id: original.user_id,
            }),
        };

        posts.insert(0, shared.clone());
        self.save_posts(&posts).await?;

        tracing::info!("user {} shared {} as {}", user_id, original_post_id, shared.id);
        Ok(shared.also_(|o| tracing::trace!("output - {:?}", o)))
    }

    /// every post, newest first.
    pub async fn list_posts(&self) -> Result<Vec<Post>> { self.load_posts().await }

    pub async fn list_posts_by(&self, user_id: UserId) -> Result<Vec<Post>> {
        let mut posts = self.load_posts().await?;
        posts.retain(|p| p.user_id == user_id);

        Ok(posts)
    }

    pub async fn find_post(&self, id: PostId) -> Result<Post> {
        self.load_posts()
            .await?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| FeedError::post_not_found(id))
    }

    pub async fn search_posts(&self, PostQuery { author, text }: PostQuery) -> Result<Vec<Post>> {
        let mut posts = self.load_posts().await?;

        if let Some(author) = author {
            posts.retain(|p| p.user_id == author);
        }

        if let Some(rx) = text {
            posts.retain(|p| {
                rx.is_match(&p.content)
                    || self
                        .users
                        .find(p.user_id)
                        .map(|u| rx.is_match(&u.name))
                        .unwrap_or(false)
            });
        }

        Ok(posts)
    }
}

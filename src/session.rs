use crate::directory::UserDirectory;
use crate::entities::{Image, PostId, UserId};

/// per-viewer state the feed itself never sees.
#[derive(Debug, Clone)]
pub struct Session {
    pub current_user: UserId,
    /// post whose comment dialog is open.
    pub current_post: Option<PostId>,
    /// image staged for the next post.
    pub pending_image: Option<Image>,
}

impl Session {
    pub fn new(current_user: UserId) -> Self {
        Self {
            current_user,
            current_post: None,
            pending_image: None,
        }
    }
}

impl Default for Session {
    fn default() -> Self { Self::new(UserDirectory::DEFAULT_USER) }
}

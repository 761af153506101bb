use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, Utc};

pub type Date = DateTime<Utc>;

macro_rules! id_type {
    ($n:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $n(pub u64);

        impl fmt::Display for $n {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
        }

        impl FromStr for $n {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> { s.parse().map(Self) }
        }
    };
}

id_type!(UserId);
id_type!(PostId);
id_type!(CommentId);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub bio: String,
    pub profile_pic: String,
}

/// opaque image payload: a `data:` uri or an asset reference.
#[derive(Debug, Clone, PartialEq, Eq, ::serde::Serialize, ::serde::Deserialize)]
#[serde(transparent)]
pub struct Image(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub user_id: UserId,
    pub content: String,
    pub image: Option<Image>,
    pub timestamp: Date,
    /// present iff the post is a share.
    pub shared_from: Option<SharedFrom>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharedFrom {
    pub post_id: PostId,
    pub user_id: UserId,
}

impl Post {
    pub fn is_shared(&self) -> bool { self.shared_from.is_some() }

    pub fn is_share_of(&self, user_id: UserId, original: PostId) -> bool {
        self.user_id == user_id
            && matches!(self.shared_from, Some(SharedFrom { post_id, .. }) if post_id == original)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub user_id: UserId,
    pub text: String,
    pub timestamp: Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeState {
    pub liked: bool,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProfileStats {
    pub post_count: usize,
    pub like_count: usize,
    pub comment_count: usize,
}

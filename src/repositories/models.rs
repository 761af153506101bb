//! on-disk shape of the three persisted collections, and the checks that turn
//! them back into entities.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::{RepositoryError, COMMENTS_KEY, LIKES_KEY, POSTS_KEY};
use crate::directory::UserDirectory;
use crate::entities::{Comment, CommentId, Date, Image, Post, PostId, SharedFrom, UserId};
use crate::error::{FeedError, Result};

pub(crate) type Likes = BTreeMap<PostId, Vec<UserId>>;
pub(crate) type Comments = BTreeMap<PostId, Vec<Comment>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostModel {
    id: u64,
    user_id: u64,
    #[serde(default)]
    content: String,
    #[serde(default)]
    image: Option<Image>,
    timestamp: Date,
    #[serde(default)]
    is_shared: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    original_post_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    original_user_id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentModel {
    id: u64,
    user_id: u64,
    text: String,
    timestamp: Date,
}

fn parse<'a, T: Deserialize<'a>>(key: &'static str, raw: &'a str) -> Result<T> {
    serde_json::from_str(raw).map_err(|e| FeedError::corrupt(key, e))
}

fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| RepositoryError::Json(e).into())
}

fn known_user(key: &'static str, users: &UserDirectory, id: u64, role: &str) -> Result<UserId> {
    match users.contains(UserId(id)) {
        true => Ok(UserId(id)),
        false => Err(FeedError::corrupt(key, format!("{} refers to unknown user {}", role, id))),
    }
}

fn parse_post_key(key: &'static str, raw: &str) -> Result<PostId> {
    raw.parse()
        .map_err(|_| FeedError::corrupt(key, format!("`{}` is not a post id", raw)))
}

pub(crate) fn decode_posts(raw: Option<&str>, users: &UserDirectory) -> Result<Vec<Post>> {
    let models: Vec<PostModel> = match raw {
        Some(raw) => parse(POSTS_KEY, raw)?,
        None => return Ok(vec![]),
    };

    let mut seen = HashSet::new();
    models
        .into_iter()
        .map(|m| {
            if !seen.insert(m.id) {
                return Err(FeedError::corrupt(
                    POSTS_KEY,
                    format!("duplicated post id {}", m.id),
                ));
            }

            let user_id = known_user(POSTS_KEY, users, m.user_id, &format!("post {}", m.id))?;

            let shared_from = match (m.is_shared, m.original_post_id, m.original_user_id) {
                (true, Some(post_id), Some(user_id)) => Some(SharedFrom {
                    post_id: PostId(post_id),
                    user_id: known_user(POSTS_KEY, users, user_id, &format!("share {}", m.id))?,
                }),
                (false, None, None) => None,
                _ => {
                    return Err(FeedError::corrupt(
                        POSTS_KEY,
                        format!("post {} has inconsistent share fields", m.id),
                    ))
                },
            };

            if shared_from.is_none() && m.content.trim().is_empty() && m.image.is_none() {
                return Err(FeedError::corrupt(
                    POSTS_KEY,
                    format!("post {} has neither content nor image", m.id),
                ));
            }

            Ok(Post {
                id: PostId(m.id),
                user_id,
                content: m.content,
                image: m.image,
                timestamp: m.timestamp,
                shared_from,
            })
        })
        .collect()
}

pub(crate) fn encode_posts(posts: &[Post]) -> Result<String> {
    let models = posts
        .iter()
        .map(|p| PostModel {
            id: p.id.0,
            user_id: p.user_id.0,
            content: p.content.clone(),
            image: p.image.clone(),
            timestamp: p.timestamp,
            is_shared: p.is_shared(),
            original_post_id: p.shared_from.map(|s| s.post_id.0),
            original_user_id: p.shared_from.map(|s| s.user_id.0),
        })
        .collect::<Vec<_>>();

    encode(&models)
}

pub(crate) fn decode_likes(raw: Option<&str>, users: &UserDirectory) -> Result<Likes> {
    let models: BTreeMap<String, Vec<u64>> = match raw {
        Some(raw) => parse(LIKES_KEY, raw)?,
        None => return Ok(Likes::new()),
    };

    models
        .into_iter()
        .map(|(k, likers)| {
            let post_id = parse_post_key(LIKES_KEY, &k)?;

            let mut seen = HashSet::new();
            if let Some(dup) = likers.iter().find(|u| !seen.insert(**u)) {
                return Err(FeedError::corrupt(
                    LIKES_KEY,
                    format!("user {} likes post {} twice", dup, post_id),
                ));
            }

            let likers = likers
                .into_iter()
                .map(|u| known_user(LIKES_KEY, users, u, &format!("like on post {}", post_id)))
                .collect::<Result<Vec<_>>>()?;

            Ok((post_id, likers))
        })
        .collect()
}

pub(crate) fn encode_likes(likes: &Likes) -> Result<String> {
    let models = likes
        .iter()
        .map(|(k, v)| (k.to_string(), v.iter().map(|u| u.0).collect::<Vec<_>>()))
        .collect::<BTreeMap<_, _>>();

    encode(&models)
}

pub(crate) fn decode_comments(raw: Option<&str>, users: &UserDirectory) -> Result<Comments> {
    let models: BTreeMap<String, Vec<CommentModel>> = match raw {
        Some(raw) => parse(COMMENTS_KEY, raw)?,
        None => return Ok(Comments::new()),
    };

    let mut seen = HashSet::new();
    models
        .into_iter()
        .map(|(k, comments)| {
            let post_id = parse_post_key(COMMENTS_KEY, &k)?;

            let comments = comments
                .into_iter()
                .map(|m| {
                    if !seen.insert(m.id) {
                        return Err(FeedError::corrupt(
                            COMMENTS_KEY,
                            format!("duplicated comment id {}", m.id),
                        ));
                    }
                    if m.text.trim().is_empty() {
                        return Err(FeedError::corrupt(
                            COMMENTS_KEY,
                            format!("comment {} has empty text", m.id),
                        ));
                    }

                    let user_id =
                        known_user(COMMENTS_KEY, users, m.user_id, &format!("comment {}", m.id))?;

                    Ok(Comment {
                        id: CommentId(m.id),
                        user_id,
                        text: m.text,
                        timestamp: m.timestamp,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            Ok((post_id, comments))
        })
        .collect()
}

pub(crate) fn encode_comments(comments: &Comments) -> Result<String> {
    let models = comments
        .iter()
        .map(|(k, v)| {
            let v = v
                .iter()
                .map(|c| CommentModel {
                    id: c.id.0,
                    user_id: c.user_id.0,
                    text: c.text.clone(),
                    timestamp: c.timestamp,
                })
                .collect::<Vec<_>>();
            (k.to_string(), v)
        })
        .collect::<BTreeMap<_, _>>();

    encode(&models)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> UserDirectory { UserDirectory::seeded() }

    fn corrupt_key(r: Result<impl std::fmt::Debug>) -> &'static str {
        match r {
            Err(FeedError::CorruptState { key, .. }) => key,
            other => panic!("expected corrupt state, found: {:?}", other),
        }
    }

    #[test]
    fn absent_collections_are_empty() {
        assert!(decode_posts(None, &users()).unwrap().is_empty());
        assert!(decode_likes(None, &users()).unwrap().is_empty());
        assert!(decode_comments(None, &users()).unwrap().is_empty());
    }

    #[test]
    fn accepts_browser_shaped_posts() {
        let raw = r#"[
            {"id":1700000000001,"userId":2,"content":"hi","image":null,
             "timestamp":"2023-11-14T22:13:20.001Z","isShared":true,
             "originalPostId":1700000000000,"originalUserId":1},
            {"id":1700000000000,"userId":1,"content":"hello","image":null,
             "timestamp":"2023-11-14T22:13:20Z"}
        ]"#;

        let posts = decode_posts(Some(raw), &users()).unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(
            posts[0].shared_from,
            Some(SharedFrom {
                post_id: PostId(1700000000000),
                user_id: UserId(1),
            })
        );
        assert!(!posts[1].is_shared());
    }

    #[test]
    fn rejects_unparseable_json() {
        assert_eq!(corrupt_key(decode_posts(Some("[{"), &users())), POSTS_KEY);
        assert_eq!(corrupt_key(decode_likes(Some("[]"), &users())), LIKES_KEY);
        assert_eq!(corrupt_key(decode_comments(Some("nope"), &users())), COMMENTS_KEY);
    }

    #[test]
    fn rejects_half_shared_post() {
        let raw = r#"[{"id":1,"userId":1,"content":"x","timestamp":"2023-11-14T22:13:20Z",
                       "isShared":true,"originalPostId":5}]"#;

        assert_eq!(corrupt_key(decode_posts(Some(raw), &users())), POSTS_KEY);
    }

    #[test]
    fn rejects_empty_post() {
        let raw = r#"[{"id":1,"userId":1,"content":"  ","timestamp":"2023-11-14T22:13:20Z"}]"#;

        assert_eq!(corrupt_key(decode_posts(Some(raw), &users())), POSTS_KEY);
    }

    #[test]
    fn rejects_duplicate_likers_and_bad_keys() {
        assert_eq!(corrupt_key(decode_likes(Some(r#"{"1":[2,2]}"#), &users())), LIKES_KEY);
        assert_eq!(corrupt_key(decode_likes(Some(r#"{"abc":[2]}"#), &users())), LIKES_KEY);
    }

    #[test]
    fn rejects_duplicate_comment_ids_across_posts() {
        let raw = r#"{
            "1":[{"id":9,"userId":1,"text":"a","timestamp":"2023-11-14T22:13:20Z"}],
            "2":[{"id":9,"userId":2,"text":"b","timestamp":"2023-11-14T22:13:20Z"}]
        }"#;

        assert_eq!(corrupt_key(decode_comments(Some(raw), &users())), COMMENTS_KEY);
    }

    #[test]
    fn rejects_unknown_post_authors() {
        let author = r#"[{"id":1,"userId":99,"content":"x","timestamp":"2023-11-14T22:13:20Z"}]"#;
        let original = r#"[{"id":2,"userId":1,"content":"x","timestamp":"2023-11-14T22:13:20Z",
                            "isShared":true,"originalPostId":1,"originalUserId":99}]"#;

        assert_eq!(corrupt_key(decode_posts(Some(author), &users())), POSTS_KEY);
        assert_eq!(corrupt_key(decode_posts(Some(original), &users())), POSTS_KEY);
    }

    #[test]
    fn rejects_unknown_likers() {
        assert_eq!(corrupt_key(decode_likes(Some(r#"{"1":[999]}"#), &users())), LIKES_KEY);
    }

    #[test]
    fn rejects_unknown_commenters() {
        let raw = r#"{"1":[{"id":9,"userId":999,"text":"a","timestamp":"2023-11-14T22:13:20Z"}]}"#;

        assert_eq!(corrupt_key(decode_comments(Some(raw), &users())), COMMENTS_KEY);
    }

    #[test]
    fn empty_like_sets_are_kept() {
        let likes = decode_likes(Some(r#"{"7":[]}"#), &users()).unwrap();

        assert_eq!(likes.get(&PostId(7)), Some(&vec![]));
        assert_eq!(encode_likes(&likes).unwrap(), r#"{"7":[]}"#);
    }
}

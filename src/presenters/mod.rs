use core::fmt;

use chrono::Duration;

use crate::entities::{Comment, Date, LikeState, Post, ProfileStats, User};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub title: String,
    pub description: String,
    pub fields: Vec<(String, String)>,
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "== {}", self.title)?;
        if !self.description.is_empty() {
            write!(f, "\n{}", self.description)?;
        }
        for (k, v) in &self.fields {
            write!(f, "\n  {}: {}", k, v)?;
        }

        Ok(())
    }
}

/// a post plus what the viewer needs to render it.
#[derive(Debug, Clone)]
pub struct PostView<'a> {
    pub post: &'a Post,
    pub author: Option<&'a User>,
    pub original_author: Option<&'a User>,
    pub likes: usize,
    pub liked_by_viewer: bool,
    pub comments: usize,
}

fn name_of(user: Option<&User>) -> String {
    user.map(|u| u.name.clone())
        .unwrap_or_else(|| "unknown user".to_string())
}

pub fn format_time_ago(ts: Date, now: Date) -> String {
    let elapsed = now - ts;

    if elapsed < Duration::minutes(1) {
        "just now".to_string()
    } else if elapsed < Duration::hours(1) {
        format!("{}m ago", elapsed.num_minutes())
    } else if elapsed < Duration::days(1) {
        format!("{}h ago", elapsed.num_hours())
    } else if elapsed < Duration::days(7) {
        format!("{}d ago", elapsed.num_days())
    } else {
        ts.format("%Y-%m-%d").to_string()
    }
}

pub fn resp_from_post(title: impl ToString, view: PostView<'_>, now: Date) -> Response {
    let PostView {
        post,
        author,
        original_author,
        likes,
        liked_by_viewer,
        comments,
    } = view;

    let mut fields = vec![
        ("id".to_string(), post.id.to_string()),
        (
            "by".to_string(),
            format!("{} · {}", name_of(author), format_time_ago(post.timestamp, now)),
        ),
    ];
    if let Some(from) = post.shared_from {
        fields.push((
            "shared from".to_string(),
            format!("{} (post {})", name_of(original_author), from.post_id),
        ));
    }
    if let Some(image) = &post.image {
        let shown = match image.0.starts_with("data:") {
            true => format!("[inline image, {} bytes]", image.0.len()),
            false => image.0.clone(),
        };
        fields.push(("image".to_string(), shown));
    }
    fields.push((
        "likes".to_string(),
        match liked_by_viewer {
            true => format!("{} (liked)", likes),
            false => likes.to_string(),
        },
    ));
    fields.push(("comments".to_string(), comments.to_string()));

    Response {
        title: title.to_string(),
        description: post.content.clone(),
        fields,
    }
}

pub fn resp_from_comment(
    title: impl ToString,
    comment: &Comment,
    author: Option<&User>,
    now: Date,
) -> Response {
    Response {
        title: title.to_string(),
        description: comment.text.clone(),
        fields: vec![
            ("id".to_string(), comment.id.to_string()),
            (
                "by".to_string(),
                format!(
                    "{} · {}",
                    name_of(author),
                    format_time_ago(comment.timestamp, now)
                ),
            ),
        ],
    }
}

pub fn resp_from_like(post: impl ToString, state: LikeState) -> Response {
    Response {
        title: match state.liked {
            true => "liked post".to_string(),
            false => "unliked post".to_string(),
        },
        description: String::new(),
        fields: vec![
            ("id".to_string(), post.to_string()),
            ("likes".to_string(), state.count.to_string()),
        ],
    }
}

pub fn resp_from_user(title: impl ToString, user: &User) -> Response {
    Response {
        title: title.to_string(),
        description: user.bio.clone(),
        fields: vec![
            ("id".to_string(), user.id.to_string()),
            ("name".to_string(), user.name.clone()),
            ("picture".to_string(), user.profile_pic.clone()),
        ],
    }
}

pub fn resp_from_profile(user: &User, stats: ProfileStats) -> Response {
    let mut resp = resp_from_user(format!("profile of {}", user.name), user);
    resp.fields.extend([
        ("posts".to_string(), stats.post_count.to_string()),
        ("likes".to_string(), stats.like_count.to_string()),
        ("comments".to_string(), stats.comment_count.to_string()),
    ]);

    resp
}

pub fn resp_message(title: impl ToString, description: impl ToString) -> Response {
    Response {
        title: title.to_string(),
        description: description.to_string(),
        fields: vec![],
    }
}

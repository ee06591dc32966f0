use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PostId;

pub type CommentId = i64;

/// Comment entity - reader feedback attached to a post.
///
/// `author` is a free-text display name, not a user reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub post: PostId,
    pub author: String,
    pub text: String,
    pub created_date: DateTime<Utc>,
    pub approved: bool,
}

impl Comment {
    /// Maximum author name length, in characters.
    pub const AUTHOR_MAX_LEN: usize = 200;

    /// Mark the comment as approved. Approving twice is a no-op.
    pub fn approve(&mut self) {
        self.approved = true;
    }
}

/// A comment that has not been stored yet. Always starts unapproved.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub post: PostId,
    pub author: String,
    pub text: String,
    pub created_date: DateTime<Utc>,
}

impl NewComment {
    pub fn new(post: PostId, author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            post,
            author: author.into(),
            text: text.into(),
            created_date: Utc::now(),
        }
    }

    pub fn into_comment(self, id: CommentId) -> Comment {
        Comment {
            id,
            post: self.post,
            author: self.author,
            text: self.text,
            created_date: self.created_date,
            approved: false,
        }
    }
}

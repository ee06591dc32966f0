//! Visibility rules - which posts and comments a listing returns, and in
//! what order.
//!
//! Every repository implementation must honour these rules. The in-memory
//! store applies them directly; SQL-backed stores translate them into
//! filters and `ORDER BY` clauses.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::domain::{Comment, Post, PostId};

/// Post listing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostQuery {
    /// Posts whose `published_date` is set and not after `now`, newest first.
    Published { now: DateTime<Utc> },
    /// Posts with no `published_date`, oldest first.
    Drafts,
}

impl PostQuery {
    /// Public listing as of the current instant.
    pub fn published_now() -> Self {
        Self::Published { now: Utc::now() }
    }

    pub fn matches(&self, post: &Post) -> bool {
        match self {
            Self::Published { now } => post.is_published_at(*now),
            Self::Drafts => post.is_draft(),
        }
    }

    /// Listing order. Ties fall back to the id so results are stable.
    pub fn compare(&self, a: &Post, b: &Post) -> Ordering {
        match self {
            Self::Published { .. } => b
                .published_date
                .cmp(&a.published_date)
                .then_with(|| b.id.cmp(&a.id)),
            Self::Drafts => a
                .created_date
                .cmp(&b.created_date)
                .then_with(|| a.id.cmp(&b.id)),
        }
    }

    /// Filter and order an arbitrary set of posts.
    pub fn apply<I>(&self, posts: I) -> Vec<Post>
    where
        I: IntoIterator<Item = Post>,
    {
        let mut selected: Vec<Post> = posts.into_iter().filter(|p| self.matches(p)).collect();
        selected.sort_by(|a, b| self.compare(a, b));
        selected
    }
}

/// Comments on one post, optionally restricted to approved ones.
///
/// Results come back in store order (ascending id).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentQuery {
    pub post: PostId,
    pub approved_only: bool,
}

impl CommentQuery {
    pub fn approved(post: PostId) -> Self {
        Self {
            post,
            approved_only: true,
        }
    }

    /// Approved and pending comments alike.
    pub fn all(post: PostId) -> Self {
        Self {
            post,
            approved_only: false,
        }
    }

    pub fn matches(&self, comment: &Comment) -> bool {
        comment.post == self.post && (!self.approved_only || comment.approved)
    }
}

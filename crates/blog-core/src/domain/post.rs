use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

pub type PostId = i64;

/// Post entity - authored content with a publish lifecycle.
///
/// A post with no `published_date` is a draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub author: UserId,
    pub title: String,
    pub text: String,
    pub created_date: DateTime<Utc>,
    pub published_date: Option<DateTime<Utc>>,
}

impl Post {
    /// Maximum title length, in characters.
    pub const TITLE_MAX_LEN: usize = 200;

    /// Whether the post is visible in the public listing at `now`.
    pub fn is_published_at(&self, now: DateTime<Utc>) -> bool {
        self.published_date.is_some_and(|published| published <= now)
    }

    pub fn is_draft(&self) -> bool {
        self.published_date.is_none()
    }

    /// Stamp the post as published at `now`.
    ///
    /// Publishing again overwrites the previous timestamp. The stamp never
    /// precedes `created_date`.
    pub fn publish(&mut self, now: DateTime<Utc>) {
        self.published_date = Some(now.max(self.created_date));
    }
}

/// A post that has not been stored yet; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author: UserId,
    pub title: String,
    pub text: String,
    pub created_date: DateTime<Utc>,
}

impl NewPost {
    /// Create a new unpublished post dated now.
    pub fn new(author: UserId, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author,
            title: title.into(),
            text: text.into(),
            created_date: Utc::now(),
        }
    }

    /// Attach the store-generated id.
    pub fn into_post(self, id: PostId) -> Post {
        Post {
            id,
            author: self.author,
            title: self.title,
            text: self.text,
            created_date: self.created_date,
            published_date: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn draft() -> Post {
        NewPost::new(1, "Hello", "World").into_post(7)
    }

    #[test]
    fn new_post_is_a_draft() {
        let post = draft();
        assert!(post.is_draft());
        assert!(!post.is_published_at(Utc::now()));
    }

    #[test]
    fn publish_stamps_current_time() {
        let mut post = draft();
        let now = Utc::now();
        post.publish(now);

        assert_eq!(post.published_date, Some(now));
        assert!(post.is_published_at(now));
        assert!(!post.is_draft());
    }

    #[test]
    fn publish_never_precedes_creation() {
        let mut post = draft();
        let earlier = post.created_date - TimeDelta::hours(1);
        post.publish(earlier);

        assert_eq!(post.published_date, Some(post.created_date));
    }

    #[test]
    fn republish_overwrites_timestamp() {
        let mut post = draft();
        let first = post.created_date + TimeDelta::seconds(1);
        let second = first + TimeDelta::seconds(5);

        post.publish(first);
        post.publish(second);

        assert_eq!(post.published_date, Some(second));
    }

    #[test]
    fn future_publication_is_not_visible_yet() {
        let mut post = draft();
        let later = Utc::now() + TimeDelta::days(1);
        post.published_date = Some(later);

        assert!(!post.is_published_at(Utc::now()));
        assert!(post.is_published_at(later));
    }
}

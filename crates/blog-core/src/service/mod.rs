//! Blog operations.
//!
//! One method per request. Each resolves to a [`ViewOutcome`]; only store
//! failures surface as `Err`.

use std::sync::Arc;

use crate::domain::UserId;
use crate::error::RepoError;
use crate::forms::{FormErrors, INVALID_CHOICE};
use crate::ports::{CommentRepository, PostRepository, UserRepository};
use crate::view::{ABOUT_TEMPLATE, PageContext, ViewOutcome};

/// Returns early with [`ViewOutcome::LoginRequired`] unless the caller is
/// authenticated. Must run before any store access.
macro_rules! login_required {
    ($caller:expr) => {
        match $caller.require() {
            Ok(user) => user,
            Err(outcome) => return Ok(outcome),
        }
    };
}

mod comments;
mod posts;

pub type ViewResult = Result<ViewOutcome, RepoError>;

#[derive(Clone)]
pub struct BlogService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl BlogService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
    ) -> Self {
        Self {
            users,
            posts,
            comments,
        }
    }

    pub fn about(&self) -> ViewOutcome {
        ViewOutcome::render(ABOUT_TEMPLATE, PageContext::About {})
    }

    /// Check that a submitted author id names an existing user.
    async fn check_author(&self, author: UserId) -> Result<Option<FormErrors>, RepoError> {
        if self.users.find_by_id(author).await?.is_some() {
            return Ok(None);
        }
        let mut errors = FormErrors::default();
        errors.add("author", INVALID_CHOICE);
        Ok(Some(errors))
    }
}

#[cfg(test)]
mod tests;

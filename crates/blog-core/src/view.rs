//! Request outcomes.
//!
//! Every operation resolves to a [`ViewOutcome`]. The HTTP layer maps each
//! variant onto a response; nothing in here knows about status codes.

use serde::Serialize;

use crate::domain::{Comment, Post, PostId};
use crate::forms::{CommentForm, FormErrors, PostForm};

pub const POST_LIST_TEMPLATE: &str = "blog/post_list.html";
pub const POST_DETAIL_TEMPLATE: &str = "blog/post_detail.html";
pub const POST_FORM_TEMPLATE: &str = "blog/post_form.html";
pub const COMMENT_FORM_TEMPLATE: &str = "blog/comment_form.html";
pub const POST_CONFIRM_DELETE_TEMPLATE: &str = "blog/post_confirm_delete.html";
pub const ABOUT_TEMPLATE: &str = "about.html";
pub const LOGIN_TEMPLATE: &str = "registration/login.html";

/// Result of handling one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ViewOutcome {
    /// Render a page.
    Render(Page),
    /// Send the client elsewhere.
    Redirect(Route),
    /// The addressed entity does not exist.
    NotFound { entity: &'static str, id: i64 },
    /// A submitted form failed validation; re-present it with its errors.
    Invalid(Page),
    /// The operation needs an authenticated caller. The HTTP layer knows
    /// the path to come back to.
    LoginRequired,
}

impl ViewOutcome {
    pub fn render(template: &'static str, context: PageContext) -> Self {
        Self::Render(Page { template, context })
    }

    pub fn invalid(template: &'static str, context: PageContext) -> Self {
        Self::Invalid(Page { template, context })
    }

    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}

/// Redirect targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Route {
    PostList,
    PostDetail(PostId),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::PostList => "/".to_string(),
            Route::PostDetail(id) => format!("/post/{id}/"),
        }
    }
}

/// A template name plus the data it is rendered with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub template: &'static str,
    pub context: PageContext,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PageContext {
    PostList {
        posts: Vec<Post>,
        drafts: bool,
    },
    PostDetail {
        post: Post,
        comments: Vec<Comment>,
    },
    PostForm {
        post_id: Option<PostId>,
        form: PostForm,
        errors: FormErrors,
    },
    CommentForm {
        post: PostId,
        form: CommentForm,
        errors: FormErrors,
    },
    ConfirmDelete {
        post: Post,
    },
    About {},
    Login {
        next: Option<String>,
        error: Option<&'static str>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_map_to_paths() {
        assert_eq!(Route::PostList.path(), "/");
        assert_eq!(Route::PostDetail(12).path(), "/post/12/");
    }

    #[test]
    fn page_context_serializes_without_variant_tag() {
        let page = Page {
            template: POST_LIST_TEMPLATE,
            context: PageContext::PostList {
                posts: vec![],
                drafts: true,
            },
        };

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["template"], "blog/post_list.html");
        assert_eq!(json["context"]["drafts"], true);
        assert!(json["context"]["posts"].as_array().unwrap().is_empty());
    }
}

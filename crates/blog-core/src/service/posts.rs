use chrono::Utc;

use super::{BlogService, ViewResult};
use crate::caller::{AuthenticatedUser, Caller};
use crate::domain::{NewPost, Post, PostId};
use crate::error::RepoError;
use crate::forms::{FormErrors, PostForm};
use crate::query::{CommentQuery, PostQuery};
use crate::view::{
    POST_CONFIRM_DELETE_TEMPLATE, POST_DETAIL_TEMPLATE, POST_FORM_TEMPLATE, POST_LIST_TEMPLATE,
    PageContext, Route, ViewOutcome,
};

fn form_page(post_id: Option<PostId>, form: PostForm, errors: FormErrors) -> PageContext {
    PageContext::PostForm {
        post_id,
        form,
        errors,
    }
}

fn note_foreign_post(user: &AuthenticatedUser, post: &Post, action: &str) {
    if user.id != post.author {
        tracing::debug!(
            user_id = user.id,
            post_id = post.id,
            author_id = post.author,
            action,
            "acting on a post owned by another user"
        );
    }
}

impl BlogService {
    /// Public listing: published posts, newest first.
    pub async fn post_list(&self) -> ViewResult {
        let posts = self.posts.filter(PostQuery::published_now()).await?;
        Ok(ViewOutcome::render(
            POST_LIST_TEMPLATE,
            PageContext::PostList {
                posts,
                drafts: false,
            },
        ))
    }

    /// Unpublished posts, oldest first.
    pub async fn draft_list(&self, caller: &Caller) -> ViewResult {
        login_required!(caller);

        let posts = self.posts.filter(PostQuery::Drafts).await?;
        Ok(ViewOutcome::render(
            POST_LIST_TEMPLATE,
            PageContext::PostList {
                posts,
                drafts: true,
            },
        ))
    }

    /// A single post with its comments. Anonymous readers only see approved
    /// comments; authenticated users also see the ones awaiting moderation.
    pub async fn post_detail(&self, caller: &Caller, id: PostId) -> ViewResult {
        let Some(post) = self.posts.find_by_id(id).await? else {
            return Ok(ViewOutcome::not_found("post", id));
        };

        let query = if caller.is_authenticated() {
            CommentQuery::all(id)
        } else {
            CommentQuery::approved(id)
        };
        let comments = self.comments.filter(query).await?;

        Ok(ViewOutcome::render(
            POST_DETAIL_TEMPLATE,
            PageContext::PostDetail { post, comments },
        ))
    }

    pub async fn new_post_form(&self, caller: &Caller) -> ViewResult {
        login_required!(caller);
        Ok(ViewOutcome::render(
            POST_FORM_TEMPLATE,
            form_page(None, PostForm::default(), FormErrors::default()),
        ))
    }

    /// Create a draft. The author defaults to the caller.
    pub async fn create_post(&self, caller: &Caller, form: PostForm) -> ViewResult {
        let user = login_required!(caller);

        let clean = match form.clean() {
            Ok(clean) => clean,
            Err(errors) => {
                return Ok(ViewOutcome::invalid(
                    POST_FORM_TEMPLATE,
                    form_page(None, form, errors),
                ));
            }
        };

        let author = clean.author.unwrap_or(user.id);
        if let Some(errors) = self.check_author(author).await? {
            return Ok(ViewOutcome::invalid(
                POST_FORM_TEMPLATE,
                form_page(None, form, errors),
            ));
        }

        let post = self
            .posts
            .create(NewPost::new(author, clean.title, clean.text))
            .await?;
        tracing::info!(post_id = post.id, author_id = author, "post created");

        Ok(ViewOutcome::Redirect(Route::PostDetail(post.id)))
    }

    pub async fn edit_post_form(&self, caller: &Caller, id: PostId) -> ViewResult {
        login_required!(caller);

        let Some(post) = self.posts.find_by_id(id).await? else {
            return Ok(ViewOutcome::not_found("post", id));
        };
        Ok(ViewOutcome::render(
            POST_FORM_TEMPLATE,
            form_page(Some(id), PostForm::from_post(&post), FormErrors::default()),
        ))
    }

    /// Replace title, text and optionally the author. Dates are untouched.
    pub async fn update_post(&self, caller: &Caller, id: PostId, form: PostForm) -> ViewResult {
        let user = login_required!(caller);

        let Some(mut post) = self.posts.find_by_id(id).await? else {
            return Ok(ViewOutcome::not_found("post", id));
        };

        let clean = match form.clean() {
            Ok(clean) => clean,
            Err(errors) => {
                return Ok(ViewOutcome::invalid(
                    POST_FORM_TEMPLATE,
                    form_page(Some(id), form, errors),
                ));
            }
        };

        if let Some(author) = clean.author {
            if let Some(errors) = self.check_author(author).await? {
                return Ok(ViewOutcome::invalid(
                    POST_FORM_TEMPLATE,
                    form_page(Some(id), form, errors),
                ));
            }
            post.author = author;
        }
        note_foreign_post(user, &post, "update");

        post.title = clean.title;
        post.text = clean.text;
        let post = match self.posts.save(post).await {
            Ok(post) => post,
            Err(RepoError::NotFound) => return Ok(ViewOutcome::not_found("post", id)),
            Err(e) => return Err(e),
        };
        tracing::info!(post_id = post.id, "post updated");

        Ok(ViewOutcome::Redirect(Route::PostDetail(post.id)))
    }

    pub async fn confirm_delete(&self, caller: &Caller, id: PostId) -> ViewResult {
        login_required!(caller);

        let Some(post) = self.posts.find_by_id(id).await? else {
            return Ok(ViewOutcome::not_found("post", id));
        };
        Ok(ViewOutcome::render(
            POST_CONFIRM_DELETE_TEMPLATE,
            PageContext::ConfirmDelete { post },
        ))
    }

    /// Delete a post together with its comments.
    pub async fn delete_post(&self, caller: &Caller, id: PostId) -> ViewResult {
        let user = login_required!(caller);

        let Some(post) = self.posts.find_by_id(id).await? else {
            return Ok(ViewOutcome::not_found("post", id));
        };
        note_foreign_post(user, &post, "delete");

        match self.posts.delete(id).await {
            Ok(()) => {}
            Err(RepoError::NotFound) => return Ok(ViewOutcome::not_found("post", id)),
            Err(e) => return Err(e),
        }
        tracing::info!(post_id = id, "post deleted");

        Ok(ViewOutcome::Redirect(Route::PostList))
    }

    /// Stamp `published_date` with the current time. Publishing again moves
    /// the stamp forward.
    pub async fn publish_post(&self, caller: &Caller, id: PostId) -> ViewResult {
        let user = login_required!(caller);

        let Some(mut post) = self.posts.find_by_id(id).await? else {
            return Ok(ViewOutcome::not_found("post", id));
        };
        note_foreign_post(user, &post, "publish");

        post.publish(Utc::now());
        let post = match self.posts.save(post).await {
            Ok(post) => post,
            Err(RepoError::NotFound) => return Ok(ViewOutcome::not_found("post", id)),
            Err(e) => return Err(e),
        };
        tracing::info!(post_id = post.id, published_date = ?post.published_date, "post published");

        Ok(ViewOutcome::Redirect(Route::PostDetail(post.id)))
    }
}

use super::{BlogService, ViewResult};
use crate::caller::Caller;
use crate::domain::{Comment, CommentId, NewComment, PostId};
use crate::error::RepoError;
use crate::forms::{CommentForm, FormErrors};
use crate::query::CommentQuery;
use crate::view::{COMMENT_FORM_TEMPLATE, PageContext, Route, ViewOutcome};

impl BlogService {
    /// Empty comment form for an existing post.
    pub async fn comment_form(&self, post_id: PostId) -> ViewResult {
        if self.posts.find_by_id(post_id).await?.is_none() {
            return Ok(ViewOutcome::not_found("post", post_id));
        }
        Ok(ViewOutcome::render(
            COMMENT_FORM_TEMPLATE,
            PageContext::CommentForm {
                post: post_id,
                form: CommentForm::default(),
                errors: FormErrors::default(),
            },
        ))
    }

    /// Anyone may comment, on drafts too. New comments await approval.
    pub async fn submit_comment(&self, post_id: PostId, form: CommentForm) -> ViewResult {
        if self.posts.find_by_id(post_id).await?.is_none() {
            return Ok(ViewOutcome::not_found("post", post_id));
        }

        let clean = match form.clean() {
            Ok(clean) => clean,
            Err(errors) => {
                return Ok(ViewOutcome::invalid(
                    COMMENT_FORM_TEMPLATE,
                    PageContext::CommentForm {
                        post: post_id,
                        form,
                        errors,
                    },
                ));
            }
        };

        let comment = match self
            .comments
            .create(NewComment::new(post_id, clean.author, clean.text))
            .await
        {
            Ok(comment) => comment,
            // The post vanished between the lookup and the insert.
            Err(RepoError::Constraint(_)) => return Ok(ViewOutcome::not_found("post", post_id)),
            Err(e) => return Err(e),
        };
        tracing::info!(comment_id = comment.id, post_id, "comment submitted");

        Ok(ViewOutcome::Redirect(Route::PostDetail(post_id)))
    }

    pub async fn approve_comment(&self, caller: &Caller, id: CommentId) -> ViewResult {
        login_required!(caller);

        let Some(mut comment) = self.comments.find_by_id(id).await? else {
            return Ok(ViewOutcome::not_found("comment", id));
        };
        let post_id = comment.post;

        if !comment.approved {
            comment.approve();
            match self.comments.save(comment).await {
                Ok(_) => {}
                Err(RepoError::NotFound) => return Ok(ViewOutcome::not_found("comment", id)),
                Err(e) => return Err(e),
            }
            tracing::info!(comment_id = id, post_id, "comment approved");
        }

        Ok(ViewOutcome::Redirect(Route::PostDetail(post_id)))
    }

    /// Delete a comment permanently and return to the post listing.
    pub async fn remove_comment(&self, caller: &Caller, id: CommentId) -> ViewResult {
        login_required!(caller);

        match self.comments.delete(id).await {
            Ok(()) => {}
            Err(RepoError::NotFound) => return Ok(ViewOutcome::not_found("comment", id)),
            Err(e) => return Err(e),
        }
        tracing::info!(comment_id = id, "comment removed");

        Ok(ViewOutcome::Redirect(Route::PostList))
    }

    /// Approved comments on a post, in store order.
    pub async fn approved_comments(&self, post_id: PostId) -> Result<Vec<Comment>, RepoError> {
        self.comments.filter(CommentQuery::approved(post_id)).await
    }
}

//! Comment submission and moderation.

use actix_web::{HttpRequest, HttpResponse, web};

use blog_core::domain::{CommentId, PostId};
use blog_core::forms::CommentForm;

use super::render::respond;
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /post/{id}/comment/
pub async fn comment_form(
    state: web::Data<AppState>,
    path: web::Path<PostId>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let outcome = state.blog.comment_form(path.into_inner()).await?;
    Ok(respond(outcome, &state, &req))
}

/// POST /post/{id}/comment/ - open to anonymous readers.
pub async fn submit_comment(
    state: web::Data<AppState>,
    path: web::Path<PostId>,
    form: web::Form<CommentForm>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let outcome = state
        .blog
        .submit_comment(path.into_inner(), form.into_inner())
        .await?;
    Ok(respond(outcome, &state, &req))
}

/// POST /comment/{id}/approve/
pub async fn approve_comment(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<CommentId>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let outcome = state
        .blog
        .approve_comment(&identity.caller(), path.into_inner())
        .await?;
    Ok(respond(outcome, &state, &req))
}

/// POST /comment/{id}/remove/
pub async fn remove_comment(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<CommentId>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let outcome = state
        .blog
        .remove_comment(&identity.caller(), path.into_inner())
        .await?;
    Ok(respond(outcome, &state, &req))
}

//! Post pages and post mutations.

use actix_web::{HttpRequest, HttpResponse, web};

use blog_core::domain::PostId;
use blog_core::forms::PostForm;

use super::render::{guarded_form, respond};
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /
pub async fn post_list(state: web::Data<AppState>, req: HttpRequest) -> AppResult<HttpResponse> {
    let outcome = state.blog.post_list().await?;
    Ok(respond(outcome, &state, &req))
}

/// GET /drafts/
pub async fn draft_list(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let outcome = state.blog.draft_list(&identity.caller()).await?;
    Ok(respond(outcome, &state, &req))
}

/// GET /post/{id}/
pub async fn post_detail(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<PostId>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let outcome = state
        .blog
        .post_detail(&identity.caller(), path.into_inner())
        .await?;
    Ok(respond(outcome, &state, &req))
}

/// GET /post/new/
pub async fn new_post_form(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let outcome = state.blog.new_post_form(&identity.caller()).await?;
    Ok(respond(outcome, &state, &req))
}

/// POST /post/new/
pub async fn create_post(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    form: Result<web::Form<PostForm>, actix_web::Error>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let caller = identity.caller();
    let form = match guarded_form(form, &caller) {
        Ok(form) => form,
        Err(err) => return Ok(err.error_response()),
    };
    let outcome = state.blog.create_post(&caller, form).await?;
    Ok(respond(outcome, &state, &req))
}

/// GET /post/{id}/edit/
pub async fn edit_post_form(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<PostId>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let outcome = state
        .blog
        .edit_post_form(&identity.caller(), path.into_inner())
        .await?;
    Ok(respond(outcome, &state, &req))
}

/// POST /post/{id}/edit/
pub async fn update_post(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<PostId>,
    form: Result<web::Form<PostForm>, actix_web::Error>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let caller = identity.caller();
    let form = match guarded_form(form, &caller) {
        Ok(form) => form,
        Err(err) => return Ok(err.error_response()),
    };
    let outcome = state
        .blog
        .update_post(&caller, path.into_inner(), form)
        .await?;
    Ok(respond(outcome, &state, &req))
}

/// GET /post/{id}/remove/
pub async fn confirm_delete(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<PostId>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let outcome = state
        .blog
        .confirm_delete(&identity.caller(), path.into_inner())
        .await?;
    Ok(respond(outcome, &state, &req))
}

/// POST /post/{id}/remove/
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<PostId>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let outcome = state
        .blog
        .delete_post(&identity.caller(), path.into_inner())
        .await?;
    Ok(respond(outcome, &state, &req))
}

/// POST /post/{id}/publish/
pub async fn publish_post(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<PostId>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let outcome = state
        .blog
        .publish_post(&identity.caller(), path.into_inner())
        .await?;
    Ok(respond(outcome, &state, &req))
}

//! Static pages and the browser login flow.

use std::sync::Arc;

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{HttpRequest, HttpResponse, http::header, web};
use serde::Deserialize;

use blog_core::ports::{PasswordService, TokenService};
use blog_core::view::LOGIN_TEMPLATE;
use blog_core::{Page, PageContext};

use super::render::respond;
use crate::middleware::auth::TOKEN_COOKIE;
use crate::middleware::error::AppResult;
use crate::state::AppState;

const BAD_LOGIN: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

/// GET /about/
pub async fn about(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    respond(state.blog.about(), &state, &req)
}

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    username: Option<String>,
    password: Option<String>,
    next: Option<String>,
}

/// Only same-site absolute paths are followed after login.
fn safe_next(next: Option<String>) -> Option<String> {
    next.filter(|n| n.starts_with('/') && !n.starts_with("//") && !n.contains('\\'))
}

fn login_page(next: Option<String>, error: Option<&'static str>) -> Page {
    Page {
        template: LOGIN_TEMPLATE,
        context: PageContext::Login { next, error },
    }
}

/// GET /login/
pub async fn login_page_view(query: web::Query<NextQuery>) -> HttpResponse {
    let next = safe_next(query.into_inner().next);
    HttpResponse::Ok().json(login_page(next, None))
}

/// POST /login/ - sets the token cookie and returns to `next`.
pub async fn login_submit(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    form: web::Form<LoginForm>,
) -> AppResult<HttpResponse> {
    let LoginForm {
        username,
        password,
        next,
    } = form.into_inner();
    let next = safe_next(next);

    let (Some(username), Some(password)) = (username, password) else {
        return Ok(HttpResponse::UnprocessableEntity().json(login_page(next, Some(BAD_LOGIN))));
    };

    let user = state.users.find_by_username(username.trim()).await?;
    let verified = match &user {
        Some(user) => password_service.verify(&password, &user.password_hash)?,
        None => false,
    };
    let Some(user) = user.filter(|_| verified) else {
        tracing::info!(username = %username.trim(), "login rejected");
        return Ok(HttpResponse::UnprocessableEntity().json(login_page(next, Some(BAD_LOGIN))));
    };

    let token = token_service.generate_token(user.id, &user.username)?;
    let cookie = Cookie::build(TOKEN_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(token_service.expiration_seconds()))
        .finish();

    tracing::info!(user_id = user.id, "user logged in");
    Ok(HttpResponse::SeeOther()
        .cookie(cookie)
        .insert_header((header::LOCATION, next.unwrap_or_else(|| "/".to_string())))
        .finish())
}

/// POST /logout/
pub async fn logout() -> HttpResponse {
    let mut cookie = Cookie::build(TOKEN_COOKIE, "").path("/").finish();
    cookie.make_removal();

    HttpResponse::SeeOther()
        .cookie(cookie)
        .insert_header((header::LOCATION, "/"))
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_must_stay_on_site() {
        assert_eq!(safe_next(Some("/drafts/".into())), Some("/drafts/".into()));
        assert_eq!(safe_next(Some("//evil.example".into())), None);
        assert_eq!(safe_next(Some("https://evil.example/".into())), None);
        assert_eq!(safe_next(Some("/\\evil.example".into())), None);
        assert_eq!(safe_next(None), None);
    }
}

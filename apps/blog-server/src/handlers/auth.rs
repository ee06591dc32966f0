//! JSON authentication endpoints.

use actix_web::{HttpResponse, web};
use std::sync::Arc;

use blog_core::domain::NewUser;
use blog_core::error::RepoError;
use blog_core::ports::{PasswordService, TokenService};
use blog_shared::ApiResponse;
use blog_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest, UserResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const USERNAME_MAX_LEN: usize = 150;

fn valid_username(username: &str) -> bool {
    !username.is_empty()
        && username.chars().count() <= USERNAME_MAX_LEN
        && username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let username = req.username.trim();

    if !valid_username(username) {
        return Err(AppError::BadRequest(format!(
            "Username must be 1-{USERNAME_MAX_LEN} characters: letters, digits and @/./+/-/_ only"
        )));
    }

    if state.users.find_by_username(username).await?.is_some() {
        return Err(AppError::Conflict("Username already taken".to_string()));
    }

    let password_hash = password_service.hash(&req.password)?;

    let user = state
        .users
        .create(NewUser::new(username, password_hash))
        .await
        .map_err(|e| match e {
            // Lost a race with a concurrent registration of the same name.
            RepoError::Constraint(_) => AppError::Conflict("Username already taken".to_string()),
            other => other.into(),
        })?;
    tracing::info!(user_id = user.id, "user registered");

    let token = token_service.generate_token(user.id, &user.username)?;

    Ok(HttpResponse::Created().json(AuthResponse::bearer(
        token,
        token_service.expiration_seconds() as u64,
    )))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .find_by_username(req.username.trim())
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !password_service.verify(&req.password, &user.password_hash)? {
        return Err(AppError::Unauthorized);
    }

    let token = token_service.generate_token(user.id, &user.username)?;

    Ok(HttpResponse::Ok().json(AuthResponse::bearer(
        token,
        token_service.expiration_seconds() as u64,
    )))
}

/// GET /api/auth/me - Protected route
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(UserResponse {
        id: user.id,
        username: user.username,
        date_joined: Some(user.date_joined.to_rfc3339()),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usernames_follow_the_allowed_alphabet() {
        assert!(valid_username("alice.b+blog@example"));
        assert!(!valid_username(""));
        assert!(!valid_username("has space"));
        assert!(!valid_username(&"a".repeat(151)));
    }
}

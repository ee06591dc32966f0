//! Turns a [`ViewOutcome`] into an HTTP response.

use actix_web::{HttpMessage, HttpRequest, HttpResponse, http::header, web};
use blog_core::{Caller, ViewOutcome};
use blog_shared::ErrorResponse;

use crate::observability::RequestId;
use crate::state::AppState;

/// Login URL with `next` pointing back at the request.
pub fn login_redirect_url(login_url: &str, req: &HttpRequest) -> String {
    let next = match req.query_string() {
        "" => req.path().to_string(),
        query => format!("{}?{}", req.path(), query),
    };
    format!("{}?next={}", login_url, urlencoding::encode(&next))
}

pub fn respond(outcome: ViewOutcome, state: &AppState, req: &HttpRequest) -> HttpResponse {
    match outcome {
        ViewOutcome::Render(page) => HttpResponse::Ok().json(page),
        ViewOutcome::Invalid(page) => HttpResponse::UnprocessableEntity().json(page),
        ViewOutcome::Redirect(route) => HttpResponse::SeeOther()
            .insert_header((header::LOCATION, route.path()))
            .finish(),
        ViewOutcome::NotFound { entity, id } => {
            let mut body = ErrorResponse::not_found(format!("No {entity} found with id {id}"))
                .with_instance(req.path());
            if let Some(request_id) = req.extensions().get::<RequestId>() {
                body = body.with_request_id(request_id.as_str());
            }
            HttpResponse::NotFound().json(body)
        }
        ViewOutcome::LoginRequired => HttpResponse::Found()
            .insert_header((header::LOCATION, login_redirect_url(&state.login_url, req)))
            .finish(),
    }
}

/// Body of a login-guarded form submission.
///
/// An anonymous caller's unreadable body becomes an empty form, so the
/// login redirect wins over body errors such as 415 or 413.
pub fn guarded_form<T: Default>(
    body: Result<web::Form<T>, actix_web::Error>,
    caller: &Caller,
) -> Result<T, actix_web::Error> {
    match body {
        Ok(form) => Ok(form.into_inner()),
        Err(err) if caller.is_authenticated() => Err(err),
        Err(err) => {
            tracing::debug!(error = %err, "ignoring form body of anonymous caller");
            Ok(T::default())
        }
    }
}

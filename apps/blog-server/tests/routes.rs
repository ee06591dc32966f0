use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use serde_json::Value;

use blog_core::domain::{NewUser, User};
use blog_core::ports::{PasswordService, TokenService, UserRepository};
use blog_infra::{Argon2PasswordService, InMemoryBlogStore, JwtConfig, JwtTokenService};
use blog_server::{AppState, configure_routes};

const PASSWORD: &str = "correct horse battery";

struct Harness {
    state: AppState,
    tokens: Arc<dyn TokenService>,
    passwords: Arc<dyn PasswordService>,
    user: User,
}

impl Harness {
    async fn new() -> Self {
        let store = InMemoryBlogStore::new();
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());
        let user = UserRepository::create(
            &store,
            NewUser::new("editor", passwords.hash(PASSWORD).unwrap()),
        )
        .await
        .unwrap();
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(JwtConfig {
            issuer: "blog-test".to_string(),
            ..JwtConfig::new("test-secret")
        }));

        Self {
            state: AppState::from_store(store, "/login/"),
            tokens,
            passwords,
            user,
        }
    }

    fn bearer(&self) -> (header::HeaderName, String) {
        let token = self
            .tokens
            .generate_token(self.user.id, &self.user.username)
            .unwrap();
        (header::AUTHORIZATION, format!("Bearer {token}"))
    }
}

macro_rules! app {
    ($h:expr) => {
        test::init_service(
            App::new()
                .wrap(blog_server::observability::RequestIdMiddleware)
                .app_data(web::Data::new($h.state.clone()))
                .app_data(web::Data::new($h.tokens.clone()))
                .app_data(web::Data::new($h.passwords.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

fn location<B>(resp: &actix_web::dev::ServiceResponse<B>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[actix_web::test]
async fn anonymous_mutations_redirect_to_login() {
    let h = Harness::new().await;
    let app = app!(h);

    let req = test::TestRequest::get().uri("/drafts/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/login/?next=%2Fdrafts%2F");

    let req = test::TestRequest::post()
        .uri("/post/new/")
        .set_form([("title", "Hello"), ("text", "World")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/login/?next=%2Fpost%2Fnew%2F");

    let req = test::TestRequest::get()
        .uri("/drafts/")
        .insert_header(h.bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["context"]["posts"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn anonymous_mutations_without_a_form_body_redirect_to_login() {
    let h = Harness::new().await;
    let app = app!(h);

    let req = test::TestRequest::post().uri("/post/new/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/login/?next=%2Fpost%2Fnew%2F");

    let req = test::TestRequest::post()
        .uri("/post/3/edit/")
        .set_json(serde_json::json!({"title": "Hello", "text": "World"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/login/?next=%2Fpost%2F3%2Fedit%2F");

    // Signed-in callers still hear about the unreadable body.
    let req = test::TestRequest::post()
        .uri("/post/new/")
        .insert_header(h.bearer())
        .set_json(serde_json::json!({"title": "Hello", "text": "World"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_client_error());
    assert!(location(&resp).is_empty());
}

#[actix_web::test]
async fn long_post_and_comment_bodies_are_accepted() {
    let h = Harness::new().await;
    let app = app!(h);
    let long_text = "a".repeat(20_000);

    let req = test::TestRequest::post()
        .uri("/post/new/")
        .insert_header(h.bearer())
        .set_form([("title", "Long"), ("text", long_text.as_str())])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/post/1/");

    let req = test::TestRequest::post()
        .uri("/post/1/comment/")
        .set_form([("author", "reader"), ("text", long_text.as_str())])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let req = test::TestRequest::get()
        .uri("/post/1/")
        .insert_header(h.bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["context"]["post"]["text"].as_str().unwrap().len(), 20_000);
    assert_eq!(body["context"]["comments"][0]["text"].as_str().unwrap().len(), 20_000);
}

#[actix_web::test]
async fn about_page_renders() {
    let h = Harness::new().await;
    let app = app!(h);

    let req = test::TestRequest::get().uri("/about/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["template"], "about.html");
}

#[actix_web::test]
async fn post_lifecycle_over_http() {
    let h = Harness::new().await;
    let app = app!(h);

    let req = test::TestRequest::post()
        .uri("/post/new/")
        .insert_header(h.bearer())
        .set_form([("title", "Hello"), ("text", "World"), ("published_date", "2000-01-01")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/post/1/");

    let req = test::TestRequest::get().uri("/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["template"], "blog/post_list.html");
    assert!(body["context"]["posts"].as_array().unwrap().is_empty());

    let req = test::TestRequest::get()
        .uri("/drafts/")
        .insert_header(h.bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["context"]["drafts"], true);
    assert_eq!(body["context"]["posts"][0]["title"], "Hello");

    let req = test::TestRequest::post()
        .uri("/post/1/publish/")
        .insert_header(h.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/post/1/");

    let req = test::TestRequest::get().uri("/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["context"]["posts"][0]["id"], 1);

    let req = test::TestRequest::post()
        .uri("/post/1/remove/")
        .insert_header(h.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");

    let req = test::TestRequest::get().uri("/post/1/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn invalid_post_form_is_re_presented() {
    let h = Harness::new().await;
    let app = app!(h);

    let req = test::TestRequest::post()
        .uri("/post/new/")
        .insert_header(h.bearer())
        .set_form([("title", ""), ("text", "kept")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["template"], "blog/post_form.html");
    assert_eq!(body["context"]["form"]["text"], "kept");
    assert_eq!(body["context"]["errors"]["title"][0], "This field is required.");
}

#[actix_web::test]
async fn comment_moderation_over_http() {
    let h = Harness::new().await;
    let app = app!(h);

    let req = test::TestRequest::post()
        .uri("/post/new/")
        .insert_header(h.bearer())
        .set_form([("title", "Hello"), ("text", "World")])
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/post/1/comment/")
        .set_form([("author", "reader"), ("text", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::post()
        .uri("/post/1/comment/")
        .set_form([("author", "reader"), ("text", "Nice post")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/post/1/");

    let req = test::TestRequest::get().uri("/post/1/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["context"]["comments"].as_array().unwrap().is_empty());

    let req = test::TestRequest::post()
        .uri("/comment/1/approve/")
        .insert_header(h.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/post/1/");

    let req = test::TestRequest::get().uri("/post/1/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["context"]["comments"][0]["approved"], true);

    let req = test::TestRequest::post()
        .uri("/comment/1/remove/")
        .insert_header(h.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");
}

#[actix_web::test]
async fn missing_post_is_a_problem_document() {
    let h = Harness::new().await;
    let app = app!(h);

    let req = test::TestRequest::get()
        .uri("/post/999/")
        .insert_header(("X-Request-ID", "trace-me"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(resp.headers().get("x-request-id").unwrap(), "trace-me");

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 404);
    assert_eq!(body["instance"], "/post/999/");
    assert_eq!(body["request_id"], "trace-me");
}

#[actix_web::test]
async fn login_form_sets_cookie_and_follows_next() {
    let h = Harness::new().await;
    let app = app!(h);

    let req = test::TestRequest::post()
        .uri("/login/")
        .set_form([("username", "editor"), ("password", "wrong password"), ("next", "/drafts/")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::post()
        .uri("/login/")
        .set_form([("username", "editor"), ("password", PASSWORD), ("next", "/drafts/")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/drafts/");
    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == "access_token")
        .unwrap()
        .into_owned();

    let req = test::TestRequest::get()
        .uri("/drafts/")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn json_auth_endpoints() {
    let h = Harness::new().await;
    let app = app!(h);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(serde_json::json!({"username": "newcomer", "password": "long enough"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let token = body["access_token"].as_str().unwrap().to_string();
    assert_eq!(body["token_type"], "Bearer");

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(serde_json::json!({"username": "newcomer", "password": "long enough"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["username"], "newcomer");

    let req = test::TestRequest::get().uri("/api/auth/me").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(serde_json::json!({"username": "editor", "password": "nope nope"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn health_reports_memory_store() {
    let h = Harness::new().await;
    let app = app!(h);

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
}

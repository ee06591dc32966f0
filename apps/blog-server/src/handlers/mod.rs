//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod health;
mod pages;
mod posts;
mod render;

use actix_web::web;

pub use render::login_redirect_url;

/// Largest accepted urlencoded body. Post and comment text have no length
/// limit of their own, so this sits far above actix's 16 KiB default.
pub const FORM_LIMIT: usize = 4 * 1024 * 1024;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::FormConfig::default().limit(FORM_LIMIT))
        .route("/", web::get().to(posts::post_list))
        .route("/about/", web::get().to(pages::about))
        .route("/drafts/", web::get().to(posts::draft_list))
        // Registered before /post/{id}/ so "new" is not parsed as an id.
        .service(
            web::resource("/post/new/")
                .route(web::get().to(posts::new_post_form))
                .route(web::post().to(posts::create_post)),
        )
        .route("/post/{id}/", web::get().to(posts::post_detail))
        .service(
            web::resource("/post/{id}/edit/")
                .route(web::get().to(posts::edit_post_form))
                .route(web::post().to(posts::update_post)),
        )
        .service(
            web::resource("/post/{id}/remove/")
                .route(web::get().to(posts::confirm_delete))
                .route(web::post().to(posts::delete_post)),
        )
        .route("/post/{id}/publish/", web::post().to(posts::publish_post))
        .service(
            web::resource("/post/{id}/comment/")
                .route(web::get().to(comments::comment_form))
                .route(web::post().to(comments::submit_comment)),
        )
        .route(
            "/comment/{id}/approve/",
            web::post().to(comments::approve_comment),
        )
        .route(
            "/comment/{id}/remove/",
            web::post().to(comments::remove_comment),
        )
        .service(
            web::resource("/login/")
                .route(web::get().to(pages::login_page_view))
                .route(web::post().to(pages::login_submit)),
        )
        .route("/logout/", web::post().to(pages::logout))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(health::health_check))
                .service(
                    web::scope("/auth")
                        .route("/register", web::post().to(auth::register))
                        .route("/login", web::post().to(auth::login))
                        .route("/me", web::get().to(auth::me)),
                ),
        );
}

//! # Blog Server
//!
//! actix-web front end for the blog: routes, extractors and the mapping
//! from operation outcomes to HTTP responses.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod state;
pub mod telemetry;

pub use config::AppConfig;
pub use handlers::configure_routes;
pub use state::AppState;

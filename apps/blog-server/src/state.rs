//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::BlogService;
use blog_core::ports::{CommentRepository, PostRepository, UserRepository};
use blog_infra::InMemoryBlogStore;

#[cfg(feature = "postgres")]
use blog_infra::database::{
    DatabaseConnections, PostgresCommentRepository, PostgresPostRepository,
    PostgresUserRepository,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blog: BlogService,
    pub users: Arc<dyn UserRepository>,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DatabaseConnections>>,
    pub login_url: String,
}

impl AppState {
    /// Build the state with Postgres repositories when a database is
    /// configured and reachable, the in-memory store otherwise.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        {
            if let Some(db_config) = &config.database {
                match DatabaseConnections::init(db_config).await {
                    Ok(connections) => {
                        let conn = Arc::new(connections);
                        let users: Arc<dyn UserRepository> =
                            Arc::new(PostgresUserRepository::new(conn.main.clone()));
                        let posts: Arc<dyn PostRepository> =
                            Arc::new(PostgresPostRepository::new(conn.main.clone()));
                        let comments: Arc<dyn CommentRepository> =
                            Arc::new(PostgresCommentRepository::new(conn.main.clone()));

                        tracing::info!("Application state initialized (postgres)");
                        return Self {
                            blog: BlogService::new(users.clone(), posts, comments),
                            users,
                            db: Some(conn),
                            login_url: config.login_url.clone(),
                        };
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            }
        }

        #[cfg(not(feature = "postgres"))]
        tracing::info!("Running without postgres feature - using in-memory store");

        Self::from_store(InMemoryBlogStore::new(), config.login_url.clone())
    }

    /// State backed by an in-memory store.
    pub fn from_store(store: InMemoryBlogStore, login_url: impl Into<String>) -> Self {
        let users: Arc<dyn UserRepository> = Arc::new(store.clone());
        let posts: Arc<dyn PostRepository> = Arc::new(store.clone());
        let comments: Arc<dyn CommentRepository> = Arc::new(store);

        Self {
            blog: BlogService::new(users.clone(), posts, comments),
            users,
            #[cfg(feature = "postgres")]
            db: None,
            login_url: login_url.into(),
        }
    }
}

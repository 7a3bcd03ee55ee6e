//! Application state - shared across all handlers.

use std::sync::Arc;

use inkwell_core::ports::{Clock, PasswordService, TokenService};
use inkwell_core::services::{ContentService, EngagementService, Stores, UserService};
use inkwell_infra::{Argon2PasswordService, InMemoryStore, JwtTokenService, SystemClock};

use crate::config::AppConfig;

#[cfg(feature = "postgres")]
use inkwell_infra::DatabaseConnections;
#[cfg(feature = "postgres")]
use inkwell_infra::database::{
    PostgresCommentRepository, PostgresLikeRepository, PostgresPostRepository,
    PostgresUserRepository,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub content: ContentService,
    pub engagement: EngagementService,
    pub users: UserService,
    pub tokens: Arc<dyn TokenService>,
    /// Which store backs the services, reported by the health check.
    pub storage: &'static str,
}

impl AppState {
    /// Build the application state, on PostgreSQL when it is configured and
    /// reachable, otherwise on the in-memory store.
    pub async fn new(config: &AppConfig) -> Self {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        #[cfg(feature = "postgres")]
        if let Some(db_config) = config.database() {
            match DatabaseConnections::init(&db_config).await {
                Ok(connections) => {
                    let db = connections.main;
                    let stores = Stores {
                        users: Arc::new(PostgresUserRepository::new(db.clone())),
                        posts: Arc::new(PostgresPostRepository::new(db.clone())),
                        comments: Arc::new(PostgresCommentRepository::new(db.clone())),
                        likes: Arc::new(PostgresLikeRepository::new(db)),
                        clock: Arc::new(SystemClock),
                    };
                    tracing::info!("Application state initialized (postgres)");
                    return Self::from_stores(stores, tokens, passwords, "postgres");
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

        #[cfg(not(feature = "postgres"))]
        if config.database_url.is_some() {
            tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
        }

        tracing::info!("Application state initialized (memory)");
        Self::in_memory(tokens, passwords)
    }

    /// State over a fresh in-memory store.
    pub fn in_memory(tokens: Arc<dyn TokenService>, passwords: Arc<dyn PasswordService>) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let stores = Stores::from_shared(Arc::new(InMemoryStore::new()), clock);
        Self::from_stores(stores, tokens, passwords, "memory")
    }

    fn from_stores(
        stores: Stores,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
        storage: &'static str,
    ) -> Self {
        Self {
            content: ContentService::new(stores.clone()),
            engagement: EngagementService::new(stores.clone()),
            users: UserService::new(stores, passwords),
            tokens,
            storage,
        }
    }
}

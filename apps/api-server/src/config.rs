//! Application configuration loaded from environment variables.

use std::env;

use inkwell_infra::JwtConfig;
use inkwell_infra::auth::DEFAULT_SECRET;

#[cfg(feature = "postgres")]
use inkwell_infra::DatabaseConfig;

/// Password given to the seeded `admin` account when none is configured.
const DEFAULT_ADMIN_PASSWORD: &str = "Admin123!";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub jwt: JwtConfig,
    pub bootstrap_admin_password: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = JwtConfig::default();
        let jwt = JwtConfig {
            secret: env::var("JWT_SECRET").unwrap_or_else(|_| {
                tracing::warn!("JWT_SECRET not set, using the development secret");
                DEFAULT_SECRET.to_string()
            }),
            expiration_hours: parse_var("JWT_EXPIRATION_HOURS", defaults.expiration_hours),
            issuer: env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
        };

        let bootstrap_admin_password = env::var("BOOTSTRAP_ADMIN_PASSWORD").unwrap_or_else(|_| {
            tracing::warn!("BOOTSTRAP_ADMIN_PASSWORD not set, seeding admin with the default password");
            DEFAULT_ADMIN_PASSWORD.to_string()
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT", 8080),
            database_url: env::var("DATABASE_URL").ok(),
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", 100),
            db_min_connections: parse_var("DB_MIN_CONNECTIONS", 10),
            jwt,
            bootstrap_admin_password,
        }
    }

    #[cfg(feature = "postgres")]
    pub fn database(&self) -> Option<DatabaseConfig> {
        self.database_url.as_ref().map(|url| DatabaseConfig {
            url: url.clone(),
            max_connections: self.db_max_connections,
            min_connections: self.db_min_connections,
        })
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::auth::password::PasswordError;
use crate::config::{AppConfig, Environment};
use crate::database::partial_update::PartialUpdateError;

/// Errors from the database manager and the data-access stores
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error(transparent)]
    PartialUpdate(#[from] PartialUpdateError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    pub fn not_found(message: impl Into<String>) -> Self {
        DatabaseError::NotFound(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        DatabaseError::BadRequest(message.into())
    }

    /// True when the underlying error is a Postgres unique violation (23505).
    pub fn is_unique_violation(&self) -> bool {
        match self {
            DatabaseError::Sqlx(sqlx::Error::Database(db)) => db.code().as_deref() == Some("23505"),
            _ => false,
        }
    }
}

/// Shared pool, injected into handlers as a request extension
#[derive(Clone)]
pub struct DbPool(pub PgPool);

pub struct DatabaseManager;

impl DatabaseManager {
    /// Builds the pool without opening a connection; the first query connects.
    pub fn connect_lazy(config: &AppConfig) -> Result<PgPool, DatabaseError> {
        let connection_string = Self::build_connection_string(config)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .acquire_timeout(Duration::from_secs(config.database.connection_timeout))
            .connect_lazy(&connection_string)?;

        info!("Created database pool ({:?})", config.environment);
        Ok(pool)
    }

    /// Production connections require TLS unless the URL already picks a mode.
    fn build_connection_string(config: &AppConfig) -> Result<String, DatabaseError> {
        let base = config.database_uri();
        let mut url = url::Url::parse(base)
            .map_err(|e| DatabaseError::InvalidDatabaseUrl(format!("{}: {}", base, e)))?;

        if config.environment == Environment::Production
            && !url.query_pairs().any(|(k, _)| k == "sslmode")
        {
            url.query_pairs_mut().append_pair("sslmode", "require");
        }

        Ok(url.into())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }
}

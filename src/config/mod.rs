use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub port: u16,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Test,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub test_url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub password_work_factor: u32,
}

const DEFAULT_DATABASE_URL: &str = "postgresql:///jobly";
const DEFAULT_TEST_DATABASE_URL: &str = "postgresql:///jobly_test";

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_source<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match get("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("test") => Environment::Test,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Test => Self::test(),
            Environment::Development => Self::development(),
        }
        .with_overrides(get)
    }

    fn with_overrides<F>(mut self, get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = get("PORT") {
            self.port = v.parse().unwrap_or(self.port);
        }

        // Database overrides
        if let Some(v) = get("DATABASE_URL") {
            self.database.url = v;
        }
        if let Some(v) = get("TEST_DATABASE_URL") {
            self.database.test_url = v;
        }
        if let Some(v) = get("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Some(v) = get("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Security overrides
        if let Some(v) = get("SECRET_KEY") {
            self.security.jwt_secret = v;
        }
        if let Some(v) = get("JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Some(v) = get("PASSWORD_WORK_FACTOR") {
            self.security.password_work_factor = v.parse().unwrap_or(self.security.password_work_factor);
        }

        self
    }

    /// Connection string for the current environment.
    pub fn database_uri(&self) -> &str {
        match self.environment {
            Environment::Test => &self.database.test_url,
            _ => &self.database.url,
        }
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            port: 3001,
            database: DatabaseConfig {
                url: DEFAULT_DATABASE_URL.to_string(),
                test_url: DEFAULT_TEST_DATABASE_URL.to_string(),
                max_connections: 10,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                jwt_secret: "secret-dev".to_string(),
                jwt_expiry_hours: 24,
                password_work_factor: 12,
            },
        }
    }

    fn test() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Test;
        // Lowest bcrypt cost so test suites stay fast
        config.security.password_work_factor = 4;
        config
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            port: 3001,
            database: DatabaseConfig {
                url: DEFAULT_DATABASE_URL.to_string(),
                test_url: DEFAULT_TEST_DATABASE_URL.to_string(),
                max_connections: 20,
                connection_timeout: 5,
            },
            security: SecurityConfig {
                jwt_secret: "secret-dev".to_string(),
                jwt_expiry_hours: 4,
                password_work_factor: 12,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}

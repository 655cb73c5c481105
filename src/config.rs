use anyhow::{Result, anyhow};
use std::env;

const DEVELOPMENT_JWT_SECRET: &str = "development-only-jwt-secret-change-me";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub client_base_url: String,
    pub bcrypt_cost: u32,
    pub period_min_year: i32,
    pub period_max_year: i32,
    pub default_admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_env_only()
    }

    /// Load configuration from environment variables only (without loading .env files)
    /// This is useful for testing where you want to control the environment directly
    pub fn from_env_only() -> Result<Self> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if environment == "production" => {
                return Err(anyhow!("JWT_SECRET must be set in production"));
            }
            _ => {
                log::warn!("JWT_SECRET not set, using the development signing secret");
                DEVELOPMENT_JWT_SECRET.to_string()
            }
        };

        let config = Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./payroll.db".to_string()),
            jwt_secret,
            jwt_expiration_hours: parse_var("JWT_EXPIRATION_HOURS", 24),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT", 8080),
            environment,
            client_base_url: env::var("CLIENT_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            bcrypt_cost: parse_var("BCRYPT_COST", bcrypt::DEFAULT_COST),
            period_min_year: parse_var("PERIOD_MIN_YEAR", 2000),
            period_max_year: parse_var("PERIOD_MAX_YEAR", 2100),
            default_admin_password: env::var("DEFAULT_ADMIN_PASSWORD")
                .ok()
                .filter(|p| !p.is_empty()),
        };

        if config.period_min_year > config.period_max_year {
            return Err(anyhow!(
                "PERIOD_MIN_YEAR ({}) is greater than PERIOD_MAX_YEAR ({})",
                config.period_min_year,
                config.period_max_year
            ));
        }

        Ok(config)
    }

    pub fn test_config() -> Self {
        Config {
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "test-jwt-secret-key-that-is-long-enough".to_string(),
            jwt_expiration_hours: 1,
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            client_base_url: "http://localhost:5173".to_string(),
            bcrypt_cost: 4,
            period_min_year: 2000,
            period_max_year: 2100,
            default_admin_password: None,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Inclusive range of years accepted for payroll periods.
    pub fn period_bounds(&self) -> (i32, i32) {
        (self.period_min_year, self.period_max_year)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

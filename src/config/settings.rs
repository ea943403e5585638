//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    APP_ENV_DEVELOPMENT, DEFAULT_DATABASE_URL, DEFAULT_JWT_EXPIRATION_HOURS, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT, MAX_JWT_EXPIRATION_HOURS, MIN_JWT_SECRET_LENGTH, SECONDS_PER_HOUR,
};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    pub app_env: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("app_env", &self.app_env)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if JWT_SECRET is not set or is too short (security requirement).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            } else {
                panic!("JWT_SECRET environment variable must be set in production");
            }
        });

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            jwt_secret,
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .map(|v| parse_expiration_hours(&v))
                .unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "production".to_string()),
        }
    }

    /// Build a configuration directly, bypassing the environment.
    ///
    /// Used by tests and embedders that already hold their settings.
    pub fn new(database_url: impl Into<String>, jwt_secret: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            jwt_secret: jwt_secret.into(),
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            app_env: APP_ENV_DEVELOPMENT.to_string(),
        }
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Session lifetime in seconds, shared by the token `exp` and cookie `Max-Age`.
    ///
    /// Always between one hour and `MAX_JWT_EXPIRATION_HOURS`.
    pub fn session_max_age_seconds(&self) -> i64 {
        self.jwt_expiration_hours.clamp(1, MAX_JWT_EXPIRATION_HOURS) * SECONDS_PER_HOUR
    }

    /// Cookies are marked `Secure` everywhere except local development.
    pub fn secure_cookies(&self) -> bool {
        self.app_env != APP_ENV_DEVELOPMENT
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Out-of-range or unparsable lifetimes fall back to the default.
fn parse_expiration_hours(raw: &str) -> i64 {
    match raw.trim().parse::<i64>() {
        Ok(hours) if (1..=MAX_JWT_EXPIRATION_HOURS).contains(&hours) => hours,
        _ => {
            tracing::warn!(
                value = raw,
                "JWT_EXPIRATION_HOURS out of range, using {} hours",
                DEFAULT_JWT_EXPIRATION_HOURS
            );
            DEFAULT_JWT_EXPIRATION_HOURS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::new("postgres://user:pw@db/inventory", "x".repeat(40));
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("pw@db"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn test_development_disables_secure_cookies() {
        let mut config = Config::new("sqlite::memory:", "x".repeat(40));
        assert!(!config.secure_cookies());

        config.app_env = "production".to_string();
        assert!(config.secure_cookies());
    }

    #[test]
    fn test_session_max_age_matches_expiration() {
        let config = Config::new("sqlite::memory:", "x".repeat(40));
        assert_eq!(config.session_max_age_seconds(), 30 * 24 * 60 * 60);
    }

    #[test]
    fn test_expiration_hours_outside_range_use_default() {
        assert_eq!(parse_expiration_hours("48"), 48);
        assert_eq!(parse_expiration_hours("0"), DEFAULT_JWT_EXPIRATION_HOURS);
        assert_eq!(parse_expiration_hours("-5"), DEFAULT_JWT_EXPIRATION_HOURS);
        assert_eq!(
            parse_expiration_hours("9223372036854775807"),
            DEFAULT_JWT_EXPIRATION_HOURS
        );
        assert_eq!(parse_expiration_hours("soon"), DEFAULT_JWT_EXPIRATION_HOURS);
    }

    #[test]
    fn test_session_max_age_is_clamped() {
        let mut config = Config::new("sqlite::memory:", "x".repeat(40));

        config.jwt_expiration_hours = i64::MAX;
        assert_eq!(
            config.session_max_age_seconds(),
            MAX_JWT_EXPIRATION_HOURS * SECONDS_PER_HOUR
        );

        config.jwt_expiration_hours = 0;
        assert_eq!(config.session_max_age_seconds(), SECONDS_PER_HOUR);
    }
}

//! Configuration module for the birthday board backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Email of the administrator account, exempt from ownership checks
    pub admin_email: Option<String>,
    /// Base URL of the geocoding service
    pub geocode_url: String,
    /// Base URL of the fact-generation service
    pub facts_url: String,
    /// Optional API key for the fact-generation service
    pub facts_api_key: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let db_path = env::var("BIRTHDAYS_DB_PATH")
            .unwrap_or_else(|_| "./data/birthdays.sqlite".to_string())
            .into();

        let bind_addr = env::var("BIRTHDAYS_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid BIRTHDAYS_BIND_ADDR format");

        let log_level = env::var("BIRTHDAYS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let admin_email = env::var("BIRTHDAYS_ADMIN_EMAIL")
            .ok()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty());

        let geocode_url = env::var("BIRTHDAYS_GEOCODE_URL")
            .unwrap_or_else(|_| "https://geocoding-api.open-meteo.com/v1".to_string());

        let facts_url = env::var("BIRTHDAYS_FACTS_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:11434".to_string());

        let facts_api_key = env::var("BIRTHDAYS_FACTS_API_KEY").ok();

        Self {
            db_path,
            bind_addr,
            log_level,
            admin_email,
            geocode_url,
            facts_url,
            facts_api_key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("BIRTHDAYS_DB_PATH");
        env::remove_var("BIRTHDAYS_BIND_ADDR");
        env::remove_var("BIRTHDAYS_LOG_LEVEL");
        env::remove_var("BIRTHDAYS_ADMIN_EMAIL");
        env::remove_var("BIRTHDAYS_GEOCODE_URL");
        env::remove_var("BIRTHDAYS_FACTS_URL");
        env::remove_var("BIRTHDAYS_FACTS_API_KEY");

        let config = Config::from_env();

        assert_eq!(config.db_path, PathBuf::from("./data/birthdays.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert!(config.admin_email.is_none());
        assert_eq!(config.geocode_url, "https://geocoding-api.open-meteo.com/v1");
        assert!(config.facts_api_key.is_none());

        // Admin email is normalized to lowercase
        env::set_var("BIRTHDAYS_ADMIN_EMAIL", "Admin@Example.COM");
        let config = Config::from_env();
        assert_eq!(config.admin_email.as_deref(), Some("admin@example.com"));
        env::remove_var("BIRTHDAYS_ADMIN_EMAIL");
    }
}

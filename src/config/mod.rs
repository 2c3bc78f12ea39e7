//! Configuration module for the complaint tracker backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::errors::AppError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite file backing per-client local storage
    pub db_path: PathBuf,
    /// Optional users seed file; the bundled seed is used when unset
    pub users_seed_path: Option<PathBuf>,
    /// Optional complaints seed file; the bundled seed is used when unset
    pub complaints_seed_path: Option<PathBuf>,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit logs as JSON lines instead of human-readable text
    pub log_json: bool,
    /// Reject status changes outside the Pending -> In-progress -> Resolved -> Completed chain
    pub strict_transitions: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let db_path = env::var("CT_DB_PATH")
            .unwrap_or_else(|_| "./data/local_storage.sqlite".to_string())
            .into();

        let users_seed_path = env::var("CT_USERS_SEED").ok().map(PathBuf::from);
        let complaints_seed_path = env::var("CT_COMPLAINTS_SEED").ok().map(PathBuf::from);

        let bind_addr = env::var("CT_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|e| AppError::Internal(format!("Invalid CT_BIND_ADDR format: {}", e)))?;

        let log_level = env::var("CT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_json = match env::var("CT_LOG_FORMAT") {
            Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "json" => true,
                "text" | "" => false,
                _ => {
                    return Err(AppError::Internal(format!(
                        "Invalid CT_LOG_FORMAT value: {}",
                        raw
                    )))
                }
            },
            Err(_) => false,
        };

        let strict_transitions = match env::var("CT_STRICT_TRANSITIONS") {
            Ok(raw) => parse_flag(&raw).ok_or_else(|| {
                AppError::Internal(format!("Invalid CT_STRICT_TRANSITIONS value: {}", raw))
            })?,
            Err(_) => false,
        };

        Ok(Self {
            db_path,
            users_seed_path,
            complaints_seed_path,
            bind_addr,
            log_level,
            log_json,
            strict_transitions,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("CT_DB_PATH");
        env::remove_var("CT_USERS_SEED");
        env::remove_var("CT_COMPLAINTS_SEED");
        env::remove_var("CT_BIND_ADDR");
        env::remove_var("CT_LOG_LEVEL");
        env::remove_var("CT_LOG_FORMAT");
        env::remove_var("CT_STRICT_TRANSITIONS");

        let config = Config::from_env().unwrap();

        assert_eq!(config.db_path, PathBuf::from("./data/local_storage.sqlite"));
        assert!(config.users_seed_path.is_none());
        assert!(config.complaints_seed_path.is_none());
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert!(!config.log_json);
        assert!(!config.strict_transitions);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag(" ON "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}

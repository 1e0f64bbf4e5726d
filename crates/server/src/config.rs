use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
    #[error("invalid value for {var}: {value}")]
    InvalidVar { var: &'static str, value: String },
}

/// The whole environment surface, read once at process start. No hot reload.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub github_token: SecretString,
    pub github_owner: String,
    /// Override for the hosting API base URL; `None` means the public API.
    pub github_api_base: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = match std::env::var("SERVER_PORT") {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidVar {
                var: "SERVER_PORT",
                value,
            })?,
            Err(_) => 8080,
        };

        let database_path = std::env::var("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("cms.db"));

        let github_token = std::env::var("GITHUB_TOKEN")
            .map(SecretString::from)
            .map_err(|_| ConfigError::MissingVar("GITHUB_TOKEN"))?;

        let github_owner =
            std::env::var("GITHUB_OWNER").map_err(|_| ConfigError::MissingVar("GITHUB_OWNER"))?;

        let github_api_base = std::env::var("GITHUB_API_BASE").ok();

        Ok(Self {
            host,
            port,
            database_path,
            github_token,
            github_owner,
            github_api_base,
        })
    }
}

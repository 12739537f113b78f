//! # Server Configuration
//!
//! Process configuration comes from environment variables:
//! - `STOCKROOM_HOST` (default "0.0.0.0")
//! - `STOCKROOM_PORT` (default 3000)
//! - `STOCKROOM_ENV` ("development" | "production", default development)
//! - `STOCKROOM_CORS_ORIGINS` (comma-separated; empty means permissive)

use std::env;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Run mode; gates how much error detail reaches the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

static ENVIRONMENT: OnceLock<Environment> = OnceLock::new();

impl Environment {
    /// Parse from the STOCKROOM_ENV value; unrecognized input is treated
    /// as development.
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }

    /// Record the process-wide run mode. First call wins.
    pub fn init(self) {
        let _ = ENVIRONMENT.set(self);
    }

    /// The process-wide run mode, defaulting to development when the
    /// server was never booted (unit tests).
    pub fn current() -> Self {
        *ENVIRONMENT.get().unwrap_or(&Environment::Development)
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 3000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Run mode
    #[serde(default = "default_environment")]
    pub environment: Environment,

    /// CORS allowed origins; empty means permissive (development)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_environment() -> Environment {
    Environment::Development
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let host = env::var("STOCKROOM_HOST").unwrap_or_else(|_| default_host());
        let port = env::var("STOCKROOM_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or_else(default_port);
        let environment = env::var("STOCKROOM_ENV")
            .map(|e| Environment::parse(&e))
            .unwrap_or_else(|_| default_environment());
        let cors_origins = env::var("STOCKROOM_CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            host,
            port,
            environment,
            cors_origins,
        }
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.environment, Environment::Development);
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            port: 8080,
            ..Default::default()
        };
        assert_eq!(config.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(Environment::parse("production"), Environment::Production);
        assert_eq!(Environment::parse("PROD"), Environment::Production);
        assert_eq!(Environment::parse("development"), Environment::Development);
        assert_eq!(Environment::parse("staging"), Environment::Development);
    }
}

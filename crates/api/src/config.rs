use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    /// JWT authentication configuration
    pub jwt: JwtAuthConfig,
    /// Outbound metadata fetcher configuration
    #[serde(default)]
    pub metadata: MetadataConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

impl DatabaseConfig {
    /// Converts to the persistence-layer pool configuration.
    pub fn to_db_config(&self) -> persistence::db::DatabaseConfig {
        persistence::db::DatabaseConfig {
            url: self.url.clone(),
            max_connections: self.max_connections,
            min_connections: self.min_connections,
            connect_timeout_secs: self.connect_timeout_secs,
            idle_timeout_secs: self.idle_timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtAuthConfig {
    /// HS256 signing secret.
    pub secret: String,

    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetadataConfig {
    /// Request timeout in milliseconds for outbound page fetches.
    #[serde(default = "default_metadata_timeout_ms")]
    pub timeout_ms: u64,

    /// User-Agent header sent with outbound fetches.
    #[serde(default = "default_metadata_user_agent")]
    pub user_agent: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_metadata_timeout_ms(),
            user_agent: default_metadata_user_agent(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_idle_timeout() -> u64 {
    600
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_access_token_expiry() -> i64 {
    3600
}

fn default_metadata_timeout_ms() -> u64 {
    10_000
}

fn default_metadata_user_agent() -> String {
    "Mozilla/5.0 (compatible; GiftwishBot/1.0)".to_string()
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with GW__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("GW").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.database.url.is_empty() {
            return Err(ConfigValidationError::MissingRequired("database.url".into()));
        }
        if self.jwt.secret.is_empty() {
            return Err(ConfigValidationError::MissingRequired("jwt.secret".into()));
        }
        Ok(())
    }

    /// Socket address the server binds to.
    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .expect("Invalid host/port configuration")
    }

    /// Load configuration for testing without relying on config files.
    pub fn load_for_test() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                request_timeout_secs: default_request_timeout(),
            },
            database: DatabaseConfig {
                url: "postgres://localhost/giftwish_test".to_string(),
                max_connections: default_max_connections(),
                min_connections: 1,
                connect_timeout_secs: default_connect_timeout(),
                idle_timeout_secs: default_idle_timeout(),
            },
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: "pretty".to_string(),
            },
            security: SecurityConfig::default(),
            jwt: JwtAuthConfig {
                secret: "test-secret-for-integration-tests".to_string(),
                access_token_expiry_secs: default_access_token_expiry(),
            },
            metadata: MetadataConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(default_host(), "0.0.0.0");
        assert_eq!(default_port(), 8080);
        assert_eq!(default_access_token_expiry(), 3600);
        assert_eq!(default_metadata_timeout_ms(), 10_000);
    }

    #[test]
    fn test_socket_addr() {
        let config = Config::load_for_test();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
    }

    #[test]
    fn test_validate_rejects_empty_database_url() {
        let mut config = Config::load_for_test();
        config.database.url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_jwt_secret() {
        let mut config = Config::load_for_test();
        config.jwt.secret = String::new();
        assert!(config.validate().is_err());
    }
}

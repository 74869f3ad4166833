use persistence::db::DatabaseConfig;
use serde::Deserialize;
use shared::identity_token::{IdentityTokenVerifier, TokenAlgorithm, TokenError};
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    /// Identity-provider token verification
    pub identity: IdentityConfig,
    /// Image blob gateway
    #[serde(default)]
    pub object_store: ObjectStoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

/// Which record store backs the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    /// Process-local state, lost on restart. Development only.
    Memory,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Postgres => "postgres",
            StorageBackend::Memory => "memory",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Requests per minute per caller identity; 0 disables the limiter.
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_minute: u32,

    /// Emit `Strict-Transport-Security`. Enable only behind TLS termination.
    #[serde(default)]
    pub hsts_enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    /// `RS256` (provider public key) or `HS256` (shared secret).
    #[serde(default = "default_identity_algorithm")]
    pub algorithm: String,

    /// PEM public key for RS256
    #[serde(default)]
    pub public_key: String,

    /// Shared secret for HS256
    #[serde(default)]
    pub secret: String,

    /// Expected `iss` claim, if any
    #[serde(default)]
    pub issuer: Option<String>,

    /// Leeway in seconds for clock skew tolerance (default: 30)
    #[serde(default = "default_identity_leeway")]
    pub leeway_secs: u64,
}

impl IdentityConfig {
    /// Builds the token verifier described by this configuration.
    pub fn verifier(&self) -> Result<IdentityTokenVerifier, TokenError> {
        let issuer = self.issuer.clone().filter(|iss| !iss.is_empty());
        match self.algorithm.parse::<TokenAlgorithm>()? {
            TokenAlgorithm::Rs256 => {
                IdentityTokenVerifier::from_rsa_public_key(&self.public_key, issuer, self.leeway_secs)
            }
            TokenAlgorithm::Hs256 => {
                IdentityTokenVerifier::from_secret(&self.secret, issuer, self.leeway_secs)
            }
        }
    }
}

/// Object-store gateway used for image uploads.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectStoreConfig {
    /// When disabled, images live in a process-local blob store.
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub base_url: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_object_store_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ObjectStoreConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: String::new(),
            api_key: String::new(),
            timeout_ms: default_object_store_timeout_ms(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_max_body_size() -> usize {
    1_048_576
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_rate_limit() -> u32 {
    100
}
fn default_identity_algorithm() -> String {
    "RS256".to_string()
}
fn default_identity_leeway() -> u64 {
    shared::identity_token::DEFAULT_LEEWAY_SECS
}
fn default_object_store_timeout_ms() -> u64 {
    10000
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with SB__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("SB").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Defaults are embedded so tests do not depend on the working directory.
    /// Validation is skipped to allow partial configs.
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "127.0.0.1"
            port = 8080
            request_timeout_secs = 30
            max_body_size = 1048576

            [storage]
            backend = "memory"

            [database]
            url = ""
            max_connections = 5
            min_connections = 1
            connect_timeout_secs = 10
            idle_timeout_secs = 600

            [logging]
            level = "info"
            format = "pretty"

            [security]
            cors_origins = []
            rate_limit_per_minute = 0

            [identity]
            algorithm = "HS256"
            secret = "test_secret_key_for_identity_tokens_12345"
            leeway_secs = 0

            [object_store]
            enabled = false
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.storage.backend == StorageBackend::Postgres && self.database.url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "SB__DATABASE__URL environment variable must be set".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigValidationError::InvalidValue(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }

        match self.identity.algorithm.parse::<TokenAlgorithm>() {
            Ok(TokenAlgorithm::Rs256) if self.identity.public_key.is_empty() => {
                return Err(ConfigValidationError::MissingRequired(
                    "SB__IDENTITY__PUBLIC_KEY must be set for RS256".to_string(),
                ));
            }
            Ok(TokenAlgorithm::Hs256) if self.identity.secret.is_empty() => {
                return Err(ConfigValidationError::MissingRequired(
                    "SB__IDENTITY__SECRET must be set for HS256".to_string(),
                ));
            }
            Ok(_) => {}
            Err(e) => return Err(ConfigValidationError::InvalidValue(e.to_string())),
        }

        if self.object_store.enabled && self.object_store.base_url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "SB__OBJECT_STORE__BASE_URL must be set when the object store is enabled"
                    .to_string(),
            ));
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }
}

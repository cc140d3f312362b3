use std::env;
use std::time::Duration;

use auth::HashingCost;
use auth::PasswordHasher;
use auth::SigningSecret;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub hashing: HashingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: Option<String>,
    pub expiration_hours: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HashingConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        let cost = HashingCost::default();
        Self {
            memory_kib: cost.memory_kib,
            iterations: cost.iterations,
            parallelism: cost.parallelism,
        }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());
        let hashing = HashingConfig::default();

        let configuration = ConfigBuilder::builder()
            .set_default("database.max_connections", 5)?
            .set_default("database.acquire_timeout_secs", 5)?
            .set_default("server.http_port", 8080)?
            .set_default("server.request_timeout_secs", 30)?
            .set_default(
                "jwt.expiration_hours",
                auth::authenticator::DEFAULT_TOKEN_VALIDITY_HOURS,
            )?
            .set_default("hashing.memory_kib", i64::from(hashing.memory_kib))?
            .set_default("hashing.iterations", i64::from(hashing.iterations))?
            .set_default("hashing.parallelism", i64::from(hashing.parallelism))?
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(
                Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }

    /// Resolve the token signing secret.
    ///
    /// # Errors
    /// * `NotFound` - `jwt.secret` is absent or empty
    pub fn signing_secret(&self) -> Result<SigningSecret, ConfigError> {
        self.jwt
            .secret
            .as_deref()
            .ok_or_else(|| ConfigError::NotFound("jwt.secret".to_string()))
            .and_then(|secret| {
                SigningSecret::new(secret)
                    .map_err(|_| ConfigError::NotFound("jwt.secret".to_string()))
            })
    }

    /// Token lifetime.
    ///
    /// # Errors
    /// * `Message` - `jwt.expiration_hours` is not positive
    pub fn token_validity(&self) -> Result<chrono::Duration, ConfigError> {
        if self.jwt.expiration_hours <= 0 {
            return Err(ConfigError::Message(format!(
                "jwt.expiration_hours must be positive, got {}",
                self.jwt.expiration_hours
            )));
        }
        Ok(chrono::Duration::hours(self.jwt.expiration_hours))
    }

    /// Password hasher for the configured cost.
    ///
    /// # Errors
    /// * `Message` - Hashing parameters are out of range
    pub fn password_hasher(&self) -> Result<PasswordHasher, ConfigError> {
        PasswordHasher::with_cost(HashingCost {
            memory_kib: self.hashing.memory_kib,
            iterations: self.hashing.iterations,
            parallelism: self.hashing.parallelism,
        })
        .map_err(|e| ConfigError::Message(format!("hashing: {}", e)))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.database.acquire_timeout_secs)
    }
}

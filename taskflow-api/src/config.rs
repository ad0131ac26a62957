/// Configuration management for the API server
///
/// This module loads configuration from environment variables (and a `.env`
/// file when present) and provides a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 127.0.0.1)
/// - `API_PORT`: Port to bind to (default: 8000)
/// - `STORAGE_BACKEND`: `sql` or `json` (default: sql)
/// - `DATABASE_URL`: SQLite connection string (default: sqlite://task_manager.db)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `JSON_DB_PATH`: Document path for the json backend (default: db.json)
/// - `RUST_LOG`: Log level (default: taskflow_api=debug,tower_http=debug)
///
/// # Example
///
/// ```no_run
/// use taskflow_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use std::{env, path::PathBuf};
use taskflow_shared::{
    db::pool::{self, DEFAULT_DATABASE_URL},
    store::{json::DEFAULT_JSON_PATH, Backend},
};

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Storage backend selection
    pub storage: StorageConfig,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Which backend serves requests
    pub backend: Backend,

    /// Relational backend settings
    pub database: DatabaseConfig,

    /// Document path for the json backend
    pub json_path: PathBuf,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// SQLite connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Expands into the full pool configuration
    pub fn pool_config(&self) -> pool::DatabaseConfig {
        pool::DatabaseConfig {
            url: self.url.clone(),
            max_connections: self.max_connections,
            ..Default::default()
        }
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable has an invalid value.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = lookup("API_PORT")
            .unwrap_or_else(|| "8000".to_string())
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("API_PORT must be a port number: {}", e))?;

        let backend = lookup("STORAGE_BACKEND")
            .map(|value| value.parse::<Backend>())
            .transpose()
            .map_err(|e| anyhow::anyhow!("STORAGE_BACKEND: {}", e))?
            .unwrap_or_default();

        let url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse::<u32>()
            .map_err(|e| anyhow::anyhow!("DATABASE_MAX_CONNECTIONS must be a number: {}", e))?;

        if max_connections == 0 {
            anyhow::bail!("DATABASE_MAX_CONNECTIONS must be at least 1");
        }

        let json_path = lookup("JSON_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_JSON_PATH));

        Ok(Self {
            api: ApiConfig { host, port },
            storage: StorageConfig {
                backend,
                database: DatabaseConfig {
                    url,
                    max_connections,
                },
                json_path,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}
